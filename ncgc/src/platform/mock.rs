// ncgc/src/platform/mock.rs
//! An in-memory platform that records bus traffic for tests.

use crate::platform::traits::{Platform, PlatformError};
use crate::protocol::flags::ControlWord;

/// One command as seen by the mock platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCommand {
    /// The 8-byte command word.
    pub cmd: u64,
    /// Requested response size in bytes.
    pub read_size: u32,
    /// The control word the command was sent with.
    pub flags: ControlWord,
}

/// Mock platform for unit tests. It records every bus interaction and
/// returns queued responses.
#[derive(Debug, Default)]
pub struct MockPlatform {
    /// Commands sent over the bus, in order.
    pub sent: Vec<SentCommand>,
    /// Queued responses, consumed front-first by commands that read.
    pub responses: Vec<Vec<u8>>,
    /// io_delay calls, in order.
    pub delays: Vec<u32>,
    /// KEY2 seed pairs handed to hardware.
    pub seeds: Vec<(u64, u64)>,
    /// Number of reset calls.
    pub resets: usize,
    /// Whether the mock advertises hardware KEY2 support.
    pub hw_key2: bool,
    /// Testing hook: fail the Nth command (0-based) with the given error.
    pub fail_command: Option<(usize, PlatformError)>,
    /// Testing hook: make the next reset fail.
    pub fail_reset: bool,
}

impl MockPlatform {
    /// An empty mock: no queued responses, no injected failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next reading command.
    pub fn push_response(&mut self, resp: Vec<u8>) {
        self.responses.push(resp);
    }

    /// Arrange for the command at `index` to fail with `err`.
    pub fn fail_command_at(&mut self, index: usize, err: PlatformError) {
        self.fail_command = Some((index, err));
    }

    /// The command words sent so far.
    pub fn sent_words(&self) -> Vec<u64> {
        self.sent.iter().map(|s| s.cmd).collect()
    }
}

impl Platform for MockPlatform {
    fn reset(&mut self) -> Result<(), PlatformError> {
        if self.fail_reset {
            return Err(PlatformError::ResetFailed);
        }
        self.resets += 1;
        Ok(())
    }

    fn send_command(
        &mut self,
        cmd: u64,
        read_size: u32,
        dest: Option<&mut [u8]>,
        flags: ControlWord,
    ) -> Result<i32, PlatformError> {
        let index = self.sent.len();
        self.sent.push(SentCommand {
            cmd,
            read_size,
            flags,
        });

        if let Some((fail_index, err)) = self.fail_command {
            if index == fail_index {
                return Err(err);
            }
        }

        if let Some(dest) = dest {
            if self.responses.is_empty() {
                return Err(PlatformError::Timeout);
            }
            let resp = self.responses.remove(0);
            let n = resp.len().min(dest.len());
            dest[..n].copy_from_slice(&resp[..n]);
        }
        Ok(0)
    }

    fn io_delay(&mut self, cycles: u32) {
        self.delays.push(cycles);
    }

    fn seed_key2(&mut self, x: u64, y: u64) {
        self.seeds.push((x, y));
    }

    fn hw_key2(&self) -> bool {
        self.hw_key2
    }
}
