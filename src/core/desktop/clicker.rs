use crate::core::runtime::{ClickError, Clicker};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

/// 移动鼠标并单击左键
pub struct EnigoClicker {
    enigo: Enigo,
}

impl EnigoClicker {
    pub fn new() -> Result<Self, ClickError> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| ClickError::Backend(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl Clicker for EnigoClicker {
    fn click(&mut self, x: i32, y: i32) -> Result<(), ClickError> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| ClickError::Backend(e.to_string()))?;
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| ClickError::Backend(e.to_string()))
    }
}
