use grid_explorer_core::{
    Cell, CellId, Command, GridDimensions, ResourceKind, TerrainKind, ViewportSize,
};
use grid_explorer_system_interaction::Interaction;
use grid_explorer_world::{self as world, query, MapConfig, World};

#[test]
fn first_click_selects_and_second_click_walks() {
    let mut world = session(&["....", "....", "...."], 0);

    let commands = click(&mut world, 6);
    assert!(matches!(
        commands.as_slice(),
        [Command::SelectDestination { target, .. }] if *target == CellId::new(6)
    ));
    assert_eq!(query::target(&world), Some(CellId::new(6)));
    assert_eq!(query::path(&world).len(), 4);

    let commands = click(&mut world, 6);
    assert_eq!(commands, vec![Command::BeginWalk { collect: None }]);
    assert!(query::is_walking(&world));
    assert_eq!(query::target(&world), None);
}

#[test]
fn clicking_liquid_clears_the_selection() {
    let mut world = session(&["......", ".~....", "......"], 8);
    let _ = click(&mut world, 10);
    assert_eq!(query::target(&world), Some(CellId::new(10)));

    let commands = click(&mut world, 7);

    assert_eq!(commands, vec![Command::ClearSelection]);
    assert!(query::path(&world).is_empty());
    assert_eq!(query::target(&world), None);
}

#[test]
fn liquid_click_from_start_five_leaves_nothing_selected() {
    let mut world = session(&["....", "..~.", "....", "...."], 5);
    let _ = click(&mut world, 6);

    assert!(query::path(&world).is_empty());
    assert_eq!(query::target(&world), None);
}

#[test]
fn clicking_another_cell_replaces_the_selection() {
    let mut world = session(&[".....", ".....", "....."], 0);
    let _ = click(&mut world, 4);

    let commands = click(&mut world, 10);
    assert!(matches!(
        commands.as_slice(),
        [Command::SelectDestination { target, .. }] if *target == CellId::new(10)
    ));
    assert_eq!(query::target(&world), Some(CellId::new(10)));
    assert_eq!(
        query::path(&world),
        &[CellId::new(0), CellId::new(5), CellId::new(10)]
    );
}

#[test]
fn unreachable_cell_only_clears_an_existing_selection() {
    // Column 4 is walled off by the mountain column 3.
    let mut world = session(&["...^.", "...^.", "...^."], 0);

    assert!(click(&mut world, 4).is_empty());
    assert_eq!(query::target(&world), None);

    let _ = click(&mut world, 2);
    assert_eq!(query::target(&world), Some(CellId::new(2)));

    assert_eq!(click(&mut world, 9), vec![Command::ClearSelection]);
    assert_eq!(query::target(&world), None);
    assert!(query::path(&world).is_empty());
}

#[test]
fn resource_needs_two_clicks_to_collect() {
    let mut world = session(&["...w"], 0);

    let commands = click(&mut world, 3);
    assert_eq!(
        commands,
        vec![Command::SelectDestination {
            target: CellId::new(3),
            path: ids(&[0, 1, 2]),
        }]
    );
    assert!(!query::is_walking(&world));

    let commands = click(&mut world, 3);
    assert_eq!(
        commands,
        vec![
            Command::SelectDestination {
                target: CellId::new(3),
                path: ids(&[0, 1, 2]),
            },
            Command::BeginWalk {
                collect: Some(CellId::new(3)),
            },
        ]
    );
    assert_eq!(query::pending_collection(&world), Some(CellId::new(3)));

    advance(&mut world, 2);

    assert!(!query::is_walking(&world));
    assert_eq!(query::token(&world), Some(CellId::new(2)));
    assert_eq!(query::tally(&world).get(ResourceKind::Wood), 1);
    assert_eq!(
        query::cell(&world, CellId::new(3)).and_then(|cell| cell.resource()),
        None
    );
}

#[test]
fn route_may_cross_the_pending_resource_target() {
    let mut world = session(&["..w.."], 0);
    let _ = click(&mut world, 2);
    assert_eq!(query::path(&world), ids(&[0, 1]).as_slice());

    let commands = click(&mut world, 4);

    assert_eq!(
        commands,
        vec![Command::SelectDestination {
            target: CellId::new(4),
            path: ids(&[0, 1, 2, 3, 4]),
        }]
    );
}

#[test]
fn surrounded_resource_is_ignored() {
    let mut world = session(&[".~.", "~s~", ".~."], 0);
    let _ = click(&mut world, 2);
    let before = query::target(&world);

    assert!(click(&mut world, 4).is_empty());
    assert_eq!(query::target(&world), before);
}

#[test]
fn clicks_are_ignored_while_walking_and_outside_the_grid() {
    let mut world = session(&["....", "...."], 0);
    assert!(click(&mut world, 99).is_empty());

    let _ = click(&mut world, 7);
    let _ = click(&mut world, 7);
    assert!(query::is_walking(&world));

    assert!(click(&mut world, 4).is_empty());
    assert!(click(&mut world, 1).is_empty());
}

#[test]
fn clicks_before_placement_do_nothing() {
    let dimensions = GridDimensions::new(3, 3);
    let config = MapConfig::new(dimensions, ViewportSize::new(3, 3)).expect("valid config");
    let world = World::new(config, vec![Cell::open(); 9]).expect("valid world");

    let mut commands = Vec::new();
    Interaction::new().handle_click(&world, CellId::new(4), &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn open_field_route_forms_a_staircase() {
    let rows = vec![".........."; 10];
    let mut world = session(&rows, 0);

    let _ = click(&mut world, 33);
    let path = query::path(&world).to_vec();
    let dimensions = query::dimensions(&world);

    assert_eq!(path.len(), 7);
    assert_eq!(path.first(), Some(&CellId::new(0)));
    assert_eq!(path.last(), Some(&CellId::new(33)));
    for pair in path.windows(2) {
        assert!(dimensions.row_of(pair[1]) >= dimensions.row_of(pair[0]));
        assert!(dimensions.column_of(pair[1]) >= dimensions.column_of(pair[0]));
    }
}

fn session(rows: &[&str], start: u32) -> World {
    let columns = rows.first().map_or(0, |row| row.len()) as u32;
    let dimensions = GridDimensions::new(columns, rows.len() as u32);
    let cells = rows
        .iter()
        .flat_map(|row| row.chars())
        .map(|glyph| match glyph {
            '~' => Cell::new(TerrainKind::Water, None),
            '^' => Cell::new(TerrainKind::Mountain, None),
            'w' => Cell::new(TerrainKind::Grass, Some(ResourceKind::Wood)),
            's' => Cell::new(TerrainKind::Sand, Some(ResourceKind::Stone)),
            _ => Cell::open(),
        })
        .collect();
    let viewport = ViewportSize::new(columns.min(4), (rows.len() as u32).min(4));
    let config = MapConfig::new(dimensions, viewport).expect("valid config");
    let mut world = World::new(config, cells).expect("valid world");

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceToken {
            cell: CellId::new(start),
        },
        &mut events,
    );
    assert_eq!(query::token(&world), Some(CellId::new(start)));
    world
}

fn click(world: &mut World, cell: u32) -> Vec<Command> {
    let mut commands = Vec::new();
    Interaction::new().handle_click(world, CellId::new(cell), &mut commands);

    let mut events = Vec::new();
    for command in commands.iter().cloned() {
        world::apply(world, command, &mut events);
    }
    commands
}

fn advance(world: &mut World, steps: usize) {
    let mut events = Vec::new();
    for _ in 0..steps {
        world::apply(world, Command::AdvanceWalk, &mut events);
    }
}

fn ids(values: &[u32]) -> Vec<CellId> {
    values.iter().copied().map(CellId::new).collect()
}
