//! # Command Channel
//!
//! The frame tick is the only writer of effect state. Other threads (input,
//! gameplay, network) request changes through a bounded channel that the
//! tick drains at its top.
//!
//! ```text
//! ┌────────────┐  EffectCommand   ┌──────────────┐
//! │ gameplay   │─────────────────>│              │
//! └────────────┘                  │ EffectManager│──> SharedTransform
//! ┌────────────┐  EffectCommand   │   ::tick()   │
//! │ input      │─────────────────>│              │
//! └────────────┘                  └──────────────┘
//! ```

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use flare_core::EffectId;
use flare_quality::QualityLevel;

use crate::options::{EffectOptions, EffectRequest};
use crate::presets::Preset;

/// A state change requested from outside the tick.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectCommand {
    /// Create a screen effect.
    Create {
        /// What to create.
        request: EffectRequest,
        /// Timing and priority.
        options: EffectOptions,
    },
    /// Trigger a composite preset.
    Preset(Preset),
    /// Cancel one effect.
    Remove(EffectId),
    /// Cancel every effect and pending preset step.
    Clear,
    /// Override the quality level.
    SetQuality(QualityLevel),
    /// Turn effects on.
    Enable,
    /// Turn effects off and reset the transform.
    Disable,
}

/// Creates a bounded command channel.
#[must_use]
pub fn command_channel(capacity: usize) -> (CommandSender, CommandReceiver) {
    let (sender, receiver) = bounded(capacity.max(1));
    (CommandSender { sender }, CommandReceiver { receiver })
}

/// Producer handle. Clone one per thread.
#[derive(Clone)]
pub struct CommandSender {
    sender: Sender<EffectCommand>,
}

impl CommandSender {
    /// Queues a command without blocking.
    ///
    /// Returns `false` if the channel is full or the manager is gone; the
    /// command is dropped rather than stalling the caller's frame.
    #[inline]
    pub fn send(&self, command: EffectCommand) -> bool {
        match self.sender.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                tracing::warn!("effect command channel full, dropped {:?}", command);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Commands waiting for the next tick.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}

/// Consumer handle, owned by the manager.
pub struct CommandReceiver {
    receiver: Receiver<EffectCommand>,
}

impl CommandReceiver {
    /// Takes every queued command without blocking.
    #[inline]
    pub fn drain(&self) -> Vec<EffectCommand> {
        self.receiver.try_iter().collect()
    }

    /// Commands waiting.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}
