//! Mock I2C bus and delay provider that record what the driver does with them.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::i2c::{self, ErrorKind, ErrorType, Operation};

/// Something the driver asked of the bus or the delay provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write { address: u8, bytes: Vec<u8> },
    WriteRead { address: u8, bytes: Vec<u8>, read_len: usize },
    Delay { ns: u32 },
}

/// Events shared between the bus and delay mocks, in the order they happened,
/// plus switches to make the bus fail while the driver owns it.
#[derive(Debug, Default, Clone)]
pub struct Log {
    events: Rc<RefCell<Vec<Event>>>,
    fail_write: Rc<Cell<bool>>,
    fail_read: Rc<Cell<bool>>,
}

impl Log {
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_write.set(fail);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_read.set(fail);
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    /// Total nanoseconds of delay between the first write and the first write-read.
    pub fn settle_ns(&self) -> u64 {
        self.events()
            .iter()
            .skip_while(|e| !matches!(e, Event::Write { .. }))
            .take_while(|e| !matches!(e, Event::WriteRead { .. }))
            .map(|e| match e {
                Event::Delay { ns } => u64::from(*ns),
                _ => 0,
            })
            .sum()
    }

    /// Number of write and write-read transfers.
    pub fn transfers(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| !matches!(e, Event::Delay { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Register contents returned to the driver.
#[derive(Debug)]
pub struct MockBus {
    pub log: Log,
    pub conversion: [u8; 2],
    pub config: [u8; 2],
}

impl MockBus {
    pub fn new(log: &Log, conversion: [u8; 2]) -> Self {
        Self {
            log: log.clone(),
            conversion,
            config: [0x85, 0x83],
        }
    }

    fn handle(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), MockError> {
        match operations {
            [Operation::Write(bytes)] => {
                self.log.push(Event::Write {
                    address,
                    bytes: bytes.to_vec(),
                });
                if self.log.fail_write.get() {
                    return Err(MockError);
                }
                assert_eq!(bytes.len(), 3, "config writes are pointer + 16-bit word");
                if bytes[0] == 0x01 {
                    self.config = [bytes[1], bytes[2]];
                }
                Ok(())
            }
            [Operation::Write(bytes), Operation::Read(read)] => {
                self.log.push(Event::WriteRead {
                    address,
                    bytes: bytes.to_vec(),
                    read_len: read.len(),
                });
                if self.log.fail_read.get() {
                    return Err(MockError);
                }
                let register = match &bytes[..] {
                    [0x00] => self.conversion,
                    [0x01] => self.config,
                    _ => panic!("unexpected pointer {bytes:?}"),
                };
                read.copy_from_slice(&register);
                Ok(())
            }
            _ => panic!("not an expected transaction"),
        }
    }
}

impl ErrorType for MockBus {
    type Error = MockError;
}

impl embedded_hal::i2c::I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.handle(address, operations)
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::i2c::I2c for MockBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.handle(address, operations)
    }
}

/// Delay provider that records instead of sleeping.
#[derive(Debug)]
pub struct MockDelay {
    pub log: Log,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::Delay { ns });
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::Delay { ns });
    }
}
