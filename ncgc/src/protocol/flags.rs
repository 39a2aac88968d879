// ncgc/src/protocol/flags.rs
//! The 32-bit ROMCNT control word selecting per-command bus timing and
//! which of command/response are KEY2-encrypted.

/// Write enable (bit 30).
pub const FLAGS_WR: u32 = 1 << 30;
/// Large secure area mode: transfer blocks of 0x1000 bytes at a time (bit 28).
pub const FLAGS_SEC_LARGE: u32 = 1 << 28;
/// Transfer clock rate (0 = 6.7MHz, 1 = 4.2MHz) (bit 27).
pub const FLAGS_CLK_SLOW: u32 = 1 << 27;
/// The command transfer will be hardware encrypted (KEY2) (bit 22).
pub const FLAGS_SEC_CMD: u32 = 1 << 22;
/// Security enable (bit 14).
pub const FLAGS_SEC_EN: u32 = 1 << 14;
/// The data transfer will be hardware encrypted (KEY2) (bit 13).
pub const FLAGS_SEC_DAT: u32 = 1 << 13;

/// Mask for the pre-delay field (bits 0..13).
pub const FLAGS_DELAY1_MASK: u32 = 0x1FFF;
/// Mask for the post-delay field (bits 16..22).
pub const FLAGS_DELAY2_MASK: u32 = 0x3F << 16;

const FLAGS_DELAY_PULSE: u32 = 1 << 28;

/// Shift the post-delay value into its field.
pub const fn delay2(n: u32) -> u32 {
    (n & 0x3F) << 16
}

/// Mask the pre-delay value into its field.
pub const fn delay1(n: u32) -> u32 {
    n & 0x1FFF
}

/// A wrapper over the raw ROMCNT flags bitfield.
///
/// Getters are pure bit extractions; setters touch only their own bits.
/// The security-enable bit (14) is not independently settable: it is forced
/// on whenever either encryption sub-flag is set and cleared only once both
/// are clear, modelling the shared hardware enable line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlWord(u32);

impl ControlWord {
    /// Construct from the six logical fields.
    pub fn new(
        predelay: u16,
        postdelay: u16,
        delay_pulse_clock: bool,
        key2_command: bool,
        key2_data: bool,
        slow_clock: bool,
    ) -> Self {
        let mut flags = ControlWord(0);
        flags.set_predelay(predelay);
        flags.set_postdelay(postdelay);
        flags.set_delay_pulse_clock(delay_pulse_clock);
        flags.set_key2_command(key2_command);
        flags.set_key2_data(key2_data);
        flags.set_slow_clock(slow_clock);
        flags
    }

    /// Wrap a raw ROMCNT word (e.g. one taken from the card header).
    pub const fn from_bits(bits: u32) -> Self {
        ControlWord(bits)
    }

    /// The raw ROMCNT word.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// The delay before the response to a KEY1 command (KEY1 gap1).
    pub const fn predelay(self) -> u16 {
        (self.0 & 0x1FFF) as u16
    }

    /// The delay after the response to a KEY1 command (KEY1 gap2).
    pub const fn postdelay(self) -> u16 {
        ((self.0 >> 16) & 0x3F) as u16
    }

    /// Whether clock pulses are sent, and the KEY2 state advanced, during
    /// the pre- and post-delays.
    pub const fn delay_pulse_clock(self) -> bool {
        self.0 & FLAGS_DELAY_PULSE != 0
    }

    /// Whether the command transfer is KEY2-encrypted.
    pub const fn key2_command(self) -> bool {
        self.0 & FLAGS_SEC_CMD != 0 && self.0 & FLAGS_SEC_EN != 0
    }

    /// Whether the response transfer is KEY2-encrypted.
    pub const fn key2_data(self) -> bool {
        self.0 & FLAGS_SEC_DAT != 0 && self.0 & FLAGS_SEC_EN != 0
    }

    /// Whether the slower clock rate is used (usually for raw commands).
    pub const fn slow_clock(self) -> bool {
        self.0 & FLAGS_CLK_SLOW != 0
    }

    /// Set the delay before the response to a KEY1 command.
    pub fn set_predelay(&mut self, predelay: u16) {
        self.0 = (self.0 & !FLAGS_DELAY1_MASK) | (predelay as u32 & 0x1FFF);
    }

    /// Set the delay after the response to a KEY1 command.
    pub fn set_postdelay(&mut self, postdelay: u16) {
        self.0 = (self.0 & !FLAGS_DELAY2_MASK) | ((postdelay as u32 & 0x3F) << 16);
    }

    /// Set whether clock pulses are sent during the delays.
    pub fn set_delay_pulse_clock(&mut self, set: bool) {
        self.0 = (self.0 & !FLAGS_DELAY_PULSE) | if set { FLAGS_DELAY_PULSE } else { 0 };
    }

    /// Set whether the command transfer is KEY2-encrypted.
    pub fn set_key2_command(&mut self, set: bool) {
        let enable = set || self.key2_data();
        self.0 = (self.0 & !(FLAGS_SEC_CMD | FLAGS_SEC_EN))
            | if set { FLAGS_SEC_CMD } else { 0 }
            | if enable { FLAGS_SEC_EN } else { 0 };
    }

    /// Set whether the response transfer is KEY2-encrypted.
    pub fn set_key2_data(&mut self, set: bool) {
        let enable = set || self.key2_command();
        self.0 = (self.0 & !(FLAGS_SEC_DAT | FLAGS_SEC_EN))
            | if set { FLAGS_SEC_DAT } else { 0 }
            | if enable { FLAGS_SEC_EN } else { 0 };
    }

    /// Set whether the slower clock rate is used.
    pub fn set_slow_clock(&mut self, set: bool) {
        self.0 = (self.0 & !FLAGS_CLK_SLOW) | if set { FLAGS_CLK_SLOW } else { 0 };
    }
}
