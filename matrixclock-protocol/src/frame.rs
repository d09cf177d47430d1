//! Bridge link framing
//!
//! Frame layout:
//! - START (1 byte): 0x7E
//! - TYPE (1 byte): payload kind, see [`Frame::EVENT`] / [`Frame::REQUEST`]
//! - LENGTH (2 bytes, little endian): payload length (0-300)
//! - PAYLOAD
//! - CHECKSUM (2 bytes, little endian): Fletcher-16 over TYPE, LENGTH and PAYLOAD

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x7E;

/// Maximum payload size in bytes
pub const MAX_FRAME_PAYLOAD: usize = 300;

/// Bytes around the payload (START + TYPE + LENGTH + CHECKSUM)
const FRAME_OVERHEAD: usize = 1 + 1 + 2 + 2;

/// Maximum encoded frame size
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_FRAME_PAYLOAD;

/// Errors that can occur while framing or unframing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds [`MAX_FRAME_PAYLOAD`]
    PayloadTooLarge,
    /// Declared length exceeds [`MAX_FRAME_PAYLOAD`]
    BadLength,
    /// Checksum mismatch
    BadChecksum,
    /// Output buffer too small
    BufferTooSmall,
    /// Payload could not be (de)serialized
    Codec,
}

/// A link frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Payload kind
    pub kind: u8,
    /// Payload bytes
    pub payload: Vec<u8, MAX_FRAME_PAYLOAD>,
}

impl Frame {
    /// Frame carrying a postcard-encoded `BridgeEvent`
    pub const EVENT: u8 = 0x45;
    /// Frame carrying a postcard-encoded `ControllerRequest`
    pub const REQUEST: u8 = 0x52;

    /// Create a frame from a payload slice
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { kind, payload })
    }

    /// Write the encoded frame into `out`, returning the encoded length
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.payload.len();
        let total = FRAME_OVERHEAD + len;
        let out = out.get_mut(..total).ok_or(FrameError::BufferTooSmall)?;

        let [len_lo, len_hi] = (len as u16).to_le_bytes();
        out[0] = FRAME_START;
        out[1] = self.kind;
        out[2] = len_lo;
        out[3] = len_hi;
        out[4..4 + len].copy_from_slice(&self.payload);

        let mut sum = Fletcher16::new();
        sum.update(&out[1..4 + len]);
        out[4 + len..].copy_from_slice(&sum.value().to_le_bytes());

        Ok(total)
    }
}

/// Running Fletcher-16 checksum
#[derive(Debug, Clone, Copy)]
struct Fletcher16 {
    low: u16,
    high: u16,
}

impl Fletcher16 {
    const fn new() -> Self {
        Self { low: 0, high: 0 }
    }

    fn push(&mut self, byte: u8) {
        self.low = (self.low + u16::from(byte)) % 255;
        self.high = (self.high + self.low) % 255;
    }

    fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    const fn value(&self) -> u16 {
        (self.high << 8) | self.low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Hunting for START
    Idle,
    /// Got START, next is TYPE
    Kind,
    /// Low length byte
    LengthLow,
    /// High length byte
    LengthHigh,
    /// Collecting payload bytes
    Payload,
    /// Low checksum byte
    ChecksumLow,
    /// High checksum byte
    ChecksumHigh,
}

/// Incremental frame decoder
///
/// Bytes are pushed one at a time as they come off the UART. Garbage before
/// a START byte is skipped; a bad length or checksum resets the decoder so
/// it resynchronizes on the next START.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    kind: u8,
    length: u16,
    checksum_low: u8,
    sum: Fletcher16,
    payload: Vec<u8, MAX_FRAME_PAYLOAD>,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create an idle decoder
    pub const fn new() -> Self {
        Self {
            state: DecodeState::Idle,
            kind: 0,
            length: 0,
            checksum_low: 0,
            sum: Fletcher16::new(),
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
        self.kind = 0;
        self.length = 0;
        self.checksum_low = 0;
        self.sum = Fletcher16::new();
        self.payload.clear();
    }

    /// Push one received byte
    ///
    /// Returns `Ok(Some(frame))` once a complete, valid frame has arrived.
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            DecodeState::Idle => {
                if byte == FRAME_START {
                    self.reset();
                    self.state = DecodeState::Kind;
                }
            }
            DecodeState::Kind => {
                self.kind = byte;
                self.sum.push(byte);
                self.state = DecodeState::LengthLow;
            }
            DecodeState::LengthLow => {
                self.length = u16::from(byte);
                self.sum.push(byte);
                self.state = DecodeState::LengthHigh;
            }
            DecodeState::LengthHigh => {
                self.length |= u16::from(byte) << 8;
                self.sum.push(byte);
                if usize::from(self.length) > MAX_FRAME_PAYLOAD {
                    self.reset();
                    return Err(FrameError::BadLength);
                }
                self.state = if self.length == 0 {
                    DecodeState::ChecksumLow
                } else {
                    DecodeState::Payload
                };
            }
            DecodeState::Payload => {
                // Length was bounded when the header was read
                let _ = self.payload.push(byte);
                self.sum.push(byte);
                if self.payload.len() == usize::from(self.length) {
                    self.state = DecodeState::ChecksumLow;
                }
            }
            DecodeState::ChecksumLow => {
                self.checksum_low = byte;
                self.state = DecodeState::ChecksumHigh;
            }
            DecodeState::ChecksumHigh => {
                let received = u16::from_le_bytes([self.checksum_low, byte]);
                if received != self.sum.value() {
                    self.reset();
                    return Err(FrameError::BadChecksum);
                }

                let frame = Frame {
                    kind: self.kind,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
