//! 整合測試共用工具

use std::sync::Once;

use omoba_vision::Point2;
use vek::Vec2;

static INIT: Once = Once::new();

/// 安裝測試用的 logger，重複呼叫只有第一次有效
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] {}: {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(log::LevelFilter::Debug)
            .chain(std::io::stderr())
            .apply();
    });
}

pub fn pt(x: f64, y: f64) -> Point2 {
    Vec2::new(x, y)
}

/// 逐點比對，容許浮點誤差
#[allow(dead_code)]
pub fn assert_points_eq(actual: &[Point2], expected: &[Point2]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "頂點數量不同\n實際: {:?}\n預期: {:?}",
        actual,
        expected
    );
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            a.distance(*e) < 1e-6,
            "頂點不同\n實際: {:?}\n預期: {:?}",
            actual,
            expected
        );
    }
}
