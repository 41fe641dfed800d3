//! 有界帧环形缓冲区

use crate::core::vision::Frame;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Bounded FIFO of the most recent frames. Pushing into a full ring evicts the
/// oldest frame.
pub struct FrameRing {
    capacity: usize,
    frames: Mutex<VecDeque<Arc<Frame>>>,
}

impl FrameRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn push(&self, frame: Frame) {
        let mut frames = self.lock();
        while frames.len() >= self.capacity {
            frames.pop_front();
        }
        frames.push_back(Arc::new(frame));
    }

    /// 缓冲区满时返回一份快照（从旧到新），否则返回 None
    pub fn snapshot_if_full(&self) -> Option<Vec<Arc<Frame>>> {
        let frames = self.lock();
        if frames.len() < self.capacity {
            return None;
        }
        Some(frames.iter().cloned().collect())
    }

    pub fn snapshot(&self) -> Vec<Arc<Frame>> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // 队列内容只做整帧增删，中毒后继续使用是安全的
    fn lock(&self) -> MutexGuard<'_, VecDeque<Arc<Frame>>> {
        self.frames.lock().unwrap_or_else(|e| e.into_inner())
    }
}
