use crate::core::vision::BoundingBox;
use std::sync::{Mutex, MutexGuard};

/// Latest detection result. The lock is only held to read or replace the
/// whole list.
#[derive(Default)]
pub struct DetectionSlot {
    boxes: Mutex<Vec<BoundingBox>>,
}

impl DetectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, boxes: Vec<BoundingBox>) {
        *self.lock() = boxes;
    }

    pub fn latest(&self) -> Vec<BoundingBox> {
        self.lock().clone()
    }

    pub fn first(&self) -> Option<BoundingBox> {
        self.lock().first().copied()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BoundingBox>> {
        self.boxes.lock().unwrap_or_else(|e| e.into_inner())
    }
}
