//! Asynchronous service notices bridged into the render loop.
//!
//! The tracking service reports state changes and processing progress
//! from its own threads. Instead of callbacks firing on foreign threads,
//! notices cross into the render loop through a channel drained once per
//! tick, keeping the single-consumer-on-render-thread discipline.

use crossbeam_channel::{unbounded, Receiver, Sender};

/// A state or progress report from the tracking service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceNotice {
    /// Service state description, e.g. a detection or calibration phase.
    StateChanged(String),
    /// Processing progress in percent; 100 means finished.
    Progress(u8),
}

/// Host-side consumer of drained notices, e.g. a progress widget.
pub trait StatusSink {
    fn on_notice(&mut self, notice: &ServiceNotice);
}

/// Producer half, cloneable into the tracking service's listener threads.
#[derive(Debug, Clone)]
pub struct NoticeSender {
    tx: Sender<ServiceNotice>,
}

impl NoticeSender {
    /// Never blocks. Notices sent after the render loop is gone are
    /// dropped.
    pub fn send(&self, notice: ServiceNotice) {
        if self.tx.send(notice).is_err() {
            log::debug!("[NoticeSender::send] render loop gone, notice dropped");
        }
    }
}

/// Consumer half, owned by the render loop.
#[derive(Debug)]
pub struct NoticeChannel {
    tx: Sender<ServiceNotice>,
    rx: Receiver<ServiceNotice>,
}

impl NoticeChannel {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> NoticeSender {
        NoticeSender {
            tx: self.tx.clone(),
        }
    }

    /// Remove and return all pending notices in arrival order, without
    /// blocking. Called once per render tick, render thread only.
    pub fn drain(&self) -> Vec<ServiceNotice> {
        self.rx.try_iter().collect()
    }
}

impl Default for NoticeChannel {
    fn default() -> Self {
        Self::new()
    }
}
