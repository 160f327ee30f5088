/// 牆壁格子地圖
///
/// 每個牆格產生一個貼齊整數座標的單位正方形 `[x, x+1] × [y, y+1]`。
use vek::Vec2;

use crate::vision::{Bounds, Path, Paths};

/// 能提供目前地圖狀態下所有不透明多邊形的來源
pub trait ObstacleSource {
    fn obstacles(&self) -> Paths;

    /// 地圖範圍；沒有邊界的來源回傳 `None`
    fn world_bounds(&self) -> Option<Bounds> {
        None
    }
}

/// 格子類型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Floor,
    Wall { unbreakable: bool },
}

impl Cell {
    pub fn is_wall(&self) -> bool {
        matches!(self, Cell::Wall { .. })
    }
}

/// 以列優先儲存的格子地圖，`(0, 0)` 在左下角
#[derive(Debug, Clone)]
pub struct WallGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl WallGrid {
    /// 建立全是地板的地圖
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Floor; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// 設定格子，超出範圍時回傳 false
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn set_wall(&mut self, x: usize, y: usize, unbreakable: bool) -> bool {
        self.set_cell(x, y, Cell::Wall { unbreakable })
    }

    /// 爆炸：可破壞的牆變回地板，回傳是否有牆被打掉
    ///
    /// 地圖改變後，呼叫端要重新取一次障礙物快照。
    pub fn explode(&mut self, x: usize, y: usize) -> bool {
        match self.cell(x, y) {
            Some(Cell::Wall { unbreakable: false }) => {
                self.set_cell(x, y, Cell::Floor);
                log::debug!("wall at ({}, {}) destroyed", x, y);
                true
            }
            _ => false,
        }
    }

    /// 牆格的單位正方形，逆時針
    pub fn tile_square(x: usize, y: usize) -> Path {
        let (x, y) = (x as f64, y as f64);
        vec![
            Vec2::new(x, y),
            Vec2::new(x + 1.0, y),
            Vec2::new(x + 1.0, y + 1.0),
            Vec2::new(x, y + 1.0),
        ]
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_wall()).count()
    }
}

impl ObstacleSource for WallGrid {
    fn obstacles(&self) -> Paths {
        let mut paths = Paths::with_capacity(self.wall_count());
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y * self.width + x].is_wall() {
                    paths.push(Self::tile_square(x, y));
                }
            }
        }
        paths
    }

    fn world_bounds(&self) -> Option<Bounds> {
        Some(Bounds::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(self.width as f64, self.height as f64),
        ))
    }
}
