//! The byte-sink boundary between the rasterizer and the physical bus. Everything the rasterizer
//! emits passes through [`DisplayInterface`] as a command byte or a run of data bytes; the crate
//! never needs to read from the device (the controller has no read-back path anyway).

/// An ordered, synchronous channel to the display controller.
pub trait DisplayInterface {
    fn send_command(&mut self, cmd: u8) -> Result<(), ()>;
    fn send_data(&mut self, buf: &[u8]) -> Result<(), ()>;
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the controller, such that each word
    //! on the SPI bus is 8 bits. The "3-wire" mode replaces the D/C GPIO with a 9th bit on each
    //! word, which seems really awkward to implement with embedded_hal SPI.

    use embedded_hal as hal;

    use super::DisplayInterface;

    pub struct SpiInterface<SPI, DC> {
        /// The SPI master device connected to the display module.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the module (the fourth
        /// "wire" of "4-wire" mode).
        dc: DC,
    }

    impl<SPI, DC> SpiInterface<SPI, DC>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: hal::digital::v2::OutputPin,
    {
        /// Create a new SPI interface to communicate with the display module. `spi` is the SPI
        /// master device, and `dc` is the GPIO output pin connected to the D/C pin of the module.
        pub fn new(spi: SPI, dc: DC) -> Self {
            Self { spi, dc }
        }

        /// Release the SPI device and D/C pin.
        pub fn release(self) -> (SPI, DC) {
            (self.spi, self.dc)
        }
    }

    impl<SPI, DC> DisplayInterface for SpiInterface<SPI, DC>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: hal::digital::v2::OutputPin,
    {
        fn send_command(&mut self, cmd: u8) -> Result<(), ()> {
            self.dc.set_low().map_err(|_| ())?;
            self.spi.write(&[cmd]).map_err(|_| ())?;
            self.dc.set_high().map_err(|_| ())
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), ()> {
            self.dc.set_high().map_err(|_| ())?;
            self.spi.write(buf).map_err(|_| ())
        }
    }
}
