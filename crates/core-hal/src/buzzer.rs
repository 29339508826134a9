//! Buzzer (L0 contract) — spec.md §6, §4.3.3.

use crate::error::CoreError;

/// Canned tone sequences a caller can request in one shot, mirroring
/// `original_source`'s `buzzer_sequence` shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerSequence {
    StartCountdown,
    EndShort,
    EndRegular,
    Cancelled,
}

pub trait Buzzer: Send {
    fn set_frequency(&mut self, hz: u16) -> Result<(), CoreError>;
    fn set_volume(&mut self, level: u8) -> Result<(), CoreError>;
    fn start(&mut self) -> Result<(), CoreError>;
    fn stop(&mut self) -> Result<(), CoreError>;

    fn frequency(&self) -> u16;
    fn volume(&self) -> u8;

    /// Default dispatch for canned sequences; backends may override for
    /// hardware-specific timing, but the default is driven purely by
    /// `start`/`stop`/`set_frequency` so a test double needs no extra work.
    fn sequence(&mut self, id: BuzzerSequence, sleep: impl Fn(u64))
    where
        Self: Sized,
    {
        match id {
            BuzzerSequence::StartCountdown => {
                for hz in [2000, 1500, 500] {
                    let _ = self.set_frequency(hz);
                    let _ = self.start();
                    sleep(50);
                    let _ = self.stop();
                    sleep(950);
                }
            }
            BuzzerSequence::EndShort => {
                let _ = self.set_frequency(1000);
                let _ = self.start();
                sleep(50);
                let _ = self.set_frequency(2000);
                sleep(50);
                let _ = self.set_frequency(1500);
                sleep(50);
                let _ = self.stop();
            }
            BuzzerSequence::EndRegular => {
                let _ = self.set_frequency(1000);
                let _ = self.start();
                sleep(120);
                let _ = self.set_frequency(2000);
                sleep(120);
                let _ = self.set_frequency(1500);
                sleep(120);
                let _ = self.stop();
            }
            BuzzerSequence::Cancelled => {
                let _ = self.set_frequency(1000);
                let _ = self.start();
                sleep(100);
                let _ = self.stop();
                sleep(100);
                let _ = self.start();
                sleep(100);
                let _ = self.stop();
            }
        }
    }
}
