//! Hand-written collaborator mocks shared by the unit tests

use std::collections::VecDeque;

use matrixclock_protocol::InboundMessage;

use crate::traits::{
    Color565, ConnectProgress, DisplayError, DisplaySurface, Font, LightSensor, LocalTime,
    SensorError, TimeError, TimeSource, Transport, TransportError,
};

pub const WIDTH: u16 = 64;
pub const HEIGHT: u16 = 32;

/// One `draw_text` call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnText {
    pub x: i16,
    pub y: i16,
    pub font: Font,
    pub color: Color565,
    pub text: String,
}

/// Pixel-grid display
///
/// Text paints a single pixel at the cursor per character, then advances
/// by the font advance.
pub struct MockDisplay {
    pixels: [[Color565; WIDTH as usize]; HEIGHT as usize],
    cursor: (i16, i16),
    color: Color565,
    font: Font,
    pub texts: Vec<DrawnText>,
    pub clears: usize,
    pub brightness: Vec<u8>,
    pub fail_text: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            pixels: [[Color565::BLACK; WIDTH as usize]; HEIGHT as usize],
            cursor: (0, 0),
            color: Color565::WHITE,
            font: Font::Small,
            texts: Vec::new(),
            clears: 0,
            brightness: Vec::new(),
            fail_text: false,
        }
    }

    pub fn pixel(&self, x: i16, y: i16) -> Color565 {
        self.pixels[y as usize][x as usize]
    }

    pub fn fill(&mut self, color: Color565) {
        for row in self.pixels.iter_mut() {
            row.fill(color);
        }
    }

    /// Most recent text drawn with its cursor at (x, y)
    pub fn text_at(&self, x: i16, y: i16) -> Option<&DrawnText> {
        self.texts.iter().rev().find(|t| t.x == x && t.y == y)
    }

    pub fn last_brightness(&self) -> Option<u8> {
        self.brightness.last().copied()
    }

    fn put(&mut self, x: i16, y: i16, color: Color565) {
        if (0..WIDTH as i16).contains(&x) && (0..HEIGHT as i16).contains(&y) {
            self.pixels[y as usize][x as usize] = color;
        }
    }
}

impl DisplaySurface for MockDisplay {
    fn clear(&mut self) {
        self.fill(Color565::BLACK);
        self.clears += 1;
    }

    fn set_cursor(&mut self, x: i16, y: i16) {
        self.cursor = (x, y);
    }

    fn set_text_color(&mut self, color: Color565) {
        self.color = color;
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn draw_text(&mut self, text: &str) -> Result<(), DisplayError> {
        if self.fail_text {
            return Err(DisplayError::Bus);
        }

        self.texts.push(DrawnText {
            x: self.cursor.0,
            y: self.cursor.1,
            font: self.font,
            color: self.color,
            text: text.into(),
        });
        for _ in text.chars() {
            let (x, y) = self.cursor;
            self.put(x, y, self.color);
            self.cursor.0 += self.font.advance();
        }
        Ok(())
    }

    fn draw_hline(&mut self, x: i16, y: i16, width: u16, color: Color565) {
        for dx in 0..width as i16 {
            self.put(x + dx, y, color);
        }
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness.push(level);
    }

    fn dimensions(&self) -> (u16, u16) {
        (WIDTH, HEIGHT)
    }
}

/// Scripted light sensor
pub struct MockSensor {
    pub present: bool,
    pub readings: VecDeque<Result<f32, SensorError>>,
    pub reads: usize,
}

impl MockSensor {
    pub fn new(present: bool) -> Self {
        Self {
            present,
            readings: VecDeque::new(),
            reads: 0,
        }
    }

    pub fn with_readings(mut self, readings: &[Result<f32, SensorError>]) -> Self {
        self.readings.extend(readings.iter().copied());
        self
    }
}

impl LightSensor for MockSensor {
    fn probe(&mut self) -> bool {
        self.present
    }

    fn read_lux(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        self.readings
            .pop_front()
            .unwrap_or(Err(SensorError::NotResponding))
    }
}

/// Settable clock
pub struct MockTime {
    pub now: Result<LocalTime, TimeError>,
    pub sync_result: Result<(), TimeError>,
    pub syncs: usize,
}

impl MockTime {
    pub fn at(hour: u8, minute: u8) -> Self {
        Self {
            now: Ok(LocalTime {
                hour,
                minute,
                second: 0,
            }),
            sync_result: Ok(()),
            syncs: 0,
        }
    }
}

impl TimeSource for MockTime {
    fn local_time(&mut self) -> Result<LocalTime, TimeError> {
        self.now
    }

    fn request_sync(&mut self) -> Result<(), TimeError> {
        self.syncs += 1;
        self.sync_result
    }
}

/// Recording broker transport
pub struct MockTransport {
    pub connected: bool,
    /// Outcomes handed out by successive `connect` calls
    pub connect_script: VecDeque<Result<ConnectProgress, TransportError>>,
    pub connect_calls: Vec<String>,
    pub subscriptions: Vec<String>,
    pub published: Vec<(String, Vec<u8>)>,
    pub inbox: VecDeque<InboundMessage>,
    pub publish_result: Result<(), TransportError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            connected: false,
            connect_script: VecDeque::new(),
            connect_calls: Vec::new(),
            subscriptions: Vec::new(),
            published: Vec::new(),
            inbox: VecDeque::new(),
            publish_result: Ok(()),
        }
    }

    /// Transport that accepts the first connection attempt
    pub fn accepting() -> Self {
        let mut transport = Self::new();
        transport
            .connect_script
            .push_back(Ok(ConnectProgress::Connected));
        transport
    }

    pub fn deliver(&mut self, topic: &str, payload: &[u8]) {
        if let Some(msg) = InboundMessage::new(topic, payload) {
            self.inbox.push_back(msg);
        }
    }
}

impl Transport for MockTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self, client_id: &str) -> Result<ConnectProgress, TransportError> {
        self.connect_calls.push(client_id.into());
        let outcome = self
            .connect_script
            .pop_front()
            .unwrap_or(Err(TransportError::Rejected));
        if outcome == Ok(ConnectProgress::Connected) {
            self.connected = true;
        }
        outcome
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.subscriptions.push(topic.into());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        self.publish_result?;
        self.published.push((topic.into(), payload.to_vec()));
        Ok(())
    }

    fn poll(&mut self) -> Option<InboundMessage> {
        if !self.connected {
            return None;
        }
        self.inbox.pop_front()
    }
}
