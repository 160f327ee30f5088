mod common;

use std::fs;

use common::{init_logger, pt};
use omoba_vision::{ObstacleSource, VisionCalculator, VisionConfig, WallGrid};

/// 走廊：中間一排牆，只在 x=5 留一個可破壞的門
fn corridor() -> WallGrid {
    let mut grid = WallGrid::new(10, 10);
    for x in 0..10 {
        grid.set_wall(x, 5, x != 5);
    }
    grid
}

#[test]
fn wall_row_splits_the_map() {
    init_logger();
    let grid = corridor();
    assert_eq!(grid.obstacles().len(), 10);

    let calculator = VisionCalculator::new();
    let snapshot = calculator.prepare_from_source(&grid);
    let obstacles = &snapshot.obstacles;
    assert_eq!(obstacles.len(), 1, "整排牆應合併成一塊: {:?}", obstacles);
    assert_eq!(obstacles[0].len(), 4);

    let observer = pt(2.3, 2.6);
    let polygon = calculator.snapshot_visibility(observer, &snapshot);
    assert!(polygon.contains(pt(8.5, 1.5)));
    assert!(polygon.contains(pt(0.4, 4.5)));
    assert!(!polygon.contains(pt(2.5, 8.5)), "牆的另一側看不到");
    assert!(calculator.is_obstructed(observer, pt(2.5, 8.5), obstacles));
}

#[test]
fn explode_breakable_door() {
    init_logger();
    let mut grid = corridor();
    assert!(!grid.explode(0, 5), "外牆不可破壞");
    assert!(grid.explode(5, 5));

    let calculator = VisionCalculator::new();
    let snapshot = calculator.prepare_from_source(&grid);
    let obstacles = &snapshot.obstacles;
    assert_eq!(obstacles.len(), 2, "開門後牆被分成兩段: {:?}", obstacles);

    let observer = pt(5.5, 1.5);
    let through_door = pt(5.5, 8.5);
    assert!(calculator.is_line_of_sight_clear(observer, through_door, obstacles));
    let polygon = calculator.snapshot_visibility(observer, &snapshot);
    assert!(polygon.contains(through_door));
    assert!(!polygon.contains(pt(0.5, 9.5)), "門縫外的角落仍在陰影中");
}

#[test]
fn switching_maps_keeps_each_map_bounds() {
    init_logger();
    let calculator = VisionCalculator::new();
    let narrow = calculator.prepare_from_source(&corridor());
    let arena = calculator.prepare_from_source(&WallGrid::new(30, 30));

    assert_eq!(arena.world_bounds, WallGrid::new(30, 30).world_bounds());
    let observer = pt(20.5, 20.5);
    assert!(calculator.snapshot_visibility(observer, &narrow).is_empty());
    assert_eq!(
        calculator.snapshot_visibility(observer, &arena).vertices,
        vec![pt(0.0, 0.0), pt(30.0, 0.0), pt(30.0, 30.0), pt(0.0, 30.0)]
    );
}

#[test]
fn config_file_drives_calculation() {
    init_logger();
    let path = std::env::temp_dir().join(format!("omoba-vision-{}.toml", std::process::id()));
    fs::write(
        &path,
        r#"
[vision]
simplify_epsilon = 0.05

[vision.world_bounds]
min = { x = 0.0, y = 0.0 }
max = { x = 4.0, y = 3.0 }
"#,
    ).unwrap();

    let config = VisionConfig::load(&path).unwrap();
    fs::remove_file(&path).ok();
    assert_eq!(config.simplify_epsilon, 0.05);

    let calculator = VisionCalculator::with_config(config);
    let polygon = calculator.visibility_polygon(pt(1.0, 1.0), &[]);
    assert_eq!(
        polygon.vertices,
        vec![pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 3.0), pt(0.0, 3.0)]
    );
    assert!(calculator.visibility_polygon(pt(5.0, 1.0), &[]).is_empty(), "邊界外看不到東西");
}
