use std::time::Duration;

use grid_explorer_core::{
    Cell, CellId, Command, Event, GridDimensions, ResourceKind, TerrainKind, ViewportSize,
};
use grid_explorer_system_movement::Movement;
use grid_explorer_world::{self as world, query, MapConfig, World};

#[test]
fn token_advances_one_cell_per_interval() {
    let (mut world, mut movement) = open_session(10, 10, ViewportSize::new(4, 4), 0);
    let path = query::find_path(&world, CellId::new(0), CellId::new(33), None);
    assert_eq!(path.len(), 7);

    select_and_walk(&mut world, &mut movement, CellId::new(33), path.clone(), None);

    for step in 1..path.len() {
        step_once(&mut world, &mut movement);
        assert_eq!(query::token(&world), Some(path[step]));
        assert_eq!(query::is_walking(&world), step < path.len() - 1);

        let window = query::viewport(&world);
        let dimensions = query::dimensions(&world);
        assert!(window.contains(dimensions, path[step]));
        assert!(window.x() + window.width() <= dimensions.columns());
        assert!(window.y() + window.height() <= dimensions.rows());
    }

    assert_eq!(query::token(&world), Some(CellId::new(33)));
    assert!(query::path(&world).is_empty());
    assert_eq!(query::target(&world), None);
    assert!(!movement.is_armed());
}

#[test]
fn sub_interval_ticks_accumulate() {
    let (mut world, mut movement) = open_session(5, 5, ViewportSize::new(5, 5), 0);
    let path = query::find_path(&world, CellId::new(0), CellId::new(2), None);
    select_and_walk(&mut world, &mut movement, CellId::new(2), path, None);

    tick(&mut world, &mut movement, Duration::from_millis(100));
    tick(&mut world, &mut movement, Duration::from_millis(100));
    assert_eq!(query::token(&world), Some(CellId::new(0)));

    tick(&mut world, &mut movement, Duration::from_millis(100));
    assert_eq!(query::token(&world), Some(CellId::new(1)));
}

#[test]
fn single_long_frame_finishes_the_walk_without_overshooting() {
    let (mut world, mut movement) = open_session(6, 1, ViewportSize::new(2, 1), 0);
    let path = query::find_path(&world, CellId::new(0), CellId::new(5), None);
    select_and_walk(&mut world, &mut movement, CellId::new(5), path, None);

    let log = tick(&mut world, &mut movement, Duration::from_secs(30));

    let advanced = log
        .iter()
        .filter(|event| matches!(event, Event::TokenAdvanced { .. }))
        .count();
    assert_eq!(advanced, 5);
    assert_eq!(query::token(&world), Some(CellId::new(5)));
    assert!(!query::is_walking(&world));
    assert_eq!(query::viewport(&world).x(), 4);
}

#[test]
fn resource_is_collected_once() {
    let dimensions = GridDimensions::new(5, 1);
    let mut cells = vec![Cell::open(); dimensions.cell_count()];
    cells[4] = Cell::new(TerrainKind::Sand, Some(ResourceKind::Wood));
    let config = MapConfig::new(dimensions, ViewportSize::new(5, 1)).expect("valid config");
    let mut world = World::new(config, cells).expect("valid world");
    let mut movement = Movement::default();
    let _ = pump(&mut world, &mut movement, Command::PlaceToken { cell: CellId::new(0) });

    let resource = CellId::new(4);
    let approach = query::find_approach_path(&world, CellId::new(0), resource, None);
    assert_eq!(approach.last(), Some(&CellId::new(3)));
    select_and_walk(&mut world, &mut movement, resource, approach, Some(resource));
    let log = tick(&mut world, &mut movement, Duration::from_secs(1));

    assert!(log.contains(&Event::ResourceCollected {
        cell: resource,
        kind: ResourceKind::Wood,
        total: 1,
    }));
    assert_eq!(query::tally(&world).get(ResourceKind::Wood), 1);
    assert_eq!(
        query::cell(&world, resource).and_then(|cell| cell.resource()),
        None
    );

    let here = query::token(&world).expect("token placed");
    let log = select_and_walk(&mut world, &mut movement, resource, vec![here], Some(resource));

    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::ResourceCollected { .. })));
    assert_eq!(query::tally(&world).total(), 1);
    assert!(!query::is_walking(&world));
}

#[test]
fn disposal_cancels_pending_steps() {
    let (mut world, mut movement) = open_session(4, 4, ViewportSize::new(2, 2), 0);
    let path = query::find_path(&world, CellId::new(0), CellId::new(15), None);
    select_and_walk(&mut world, &mut movement, CellId::new(15), path, None);
    step_once(&mut world, &mut movement);
    let position = query::token(&world);

    let _ = pump(&mut world, &mut movement, Command::Dispose);
    let log = tick(&mut world, &mut movement, Duration::from_secs(5));

    assert!(log.is_empty());
    assert_eq!(query::token(&world), position);
    assert!(!movement.is_armed());
}

fn open_session(
    columns: u32,
    rows: u32,
    viewport: ViewportSize,
    start: u32,
) -> (World, Movement) {
    let dimensions = GridDimensions::new(columns, rows);
    let config = MapConfig::new(dimensions, viewport).expect("valid config");
    let mut world =
        World::new(config, vec![Cell::open(); dimensions.cell_count()]).expect("valid world");
    let mut movement = Movement::default();
    let _ = pump(
        &mut world,
        &mut movement,
        Command::PlaceToken {
            cell: CellId::new(start),
        },
    );
    (world, movement)
}

fn select_and_walk(
    world: &mut World,
    movement: &mut Movement,
    target: CellId,
    path: Vec<CellId>,
    collect: Option<CellId>,
) -> Vec<Event> {
    let mut log = pump(world, movement, Command::SelectDestination { target, path });
    log.extend(pump(world, movement, Command::BeginWalk { collect }));
    log
}

fn step_once(world: &mut World, movement: &mut Movement) {
    let _ = tick(world, movement, grid_explorer_core::STEP_INTERVAL);
}

fn tick(world: &mut World, movement: &mut Movement, dt: Duration) -> Vec<Event> {
    pump(world, movement, Command::Tick { dt })
}

fn pump(world: &mut World, movement: &mut Movement, command: Command) -> Vec<Event> {
    let mut log = Vec::new();
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    while !events.is_empty() {
        let mut commands = Vec::new();
        movement.handle(&events, &mut commands);
        log.append(&mut events);

        for command in commands {
            world::apply(world, command, &mut events);
        }
    }

    log.retain(|event| !matches!(event, Event::TimeAdvanced { .. }));
    log
}
