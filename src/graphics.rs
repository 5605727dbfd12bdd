use core::convert::Infallible;

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
};

use crate::Uc1701;

impl<SPI, CS, CD, RST, D> DrawTarget for Uc1701<SPI, CS, CD, RST, D> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }

        Ok(())
    }
}

impl<SPI, CS, CD, RST, D> OriginDimensions for Uc1701<SPI, CS, CD, RST, D> {
    fn size(&self) -> Size {
        let (width, height) = self.rotation.logical_size();
        Size::new(width as u32, height as u32)
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics_core::{geometry::Point, primitives::Rectangle};

    use super::*;
    use crate::{
        Config, Rotation,
        mock::{Bus, MockDelay, MockPin, MockSpi},
        protocol::WIDTH,
    };

    type Display = Uc1701<MockSpi, MockPin, MockPin, MockPin, MockDelay>;

    fn enabled_display(rotation: Rotation) -> Display {
        let bus = Bus::new();
        let mut display = Display::new();
        display
            .begin(
                bus.interface(true),
                Config {
                    rotation,
                    ..Config::default()
                },
            )
            .unwrap();
        display
    }

    #[test]
    fn size_follows_rotation() {
        let mut display = enabled_display(Rotation::Deg0);
        assert_eq!(OriginDimensions::size(&display), Size::new(102, 64));

        display.set_rotation(Rotation::Deg270);
        assert_eq!(OriginDimensions::size(&display), Size::new(64, 102));
    }

    #[test]
    fn fill_solid_packs_a_page_row() {
        let mut display = enabled_display(Rotation::Deg0);

        display
            .fill_solid(
                &Rectangle::new(Point::new(2, 0), Size::new(3, 8)),
                BinaryColor::On,
            )
            .unwrap();

        let page = display.framebuffer().page(0).unwrap();
        assert_eq!(&page[..6], &[0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x00]);
    }

    #[test]
    fn pixels_outside_the_surface_are_dropped() {
        let mut display = enabled_display(Rotation::Deg90);

        display
            .draw_iter([
                Pixel(Point::new(-1, 0), BinaryColor::On),
                Pixel(Point::new(64, 0), BinaryColor::On),
                Pixel(Point::new(0, 0), BinaryColor::On),
            ])
            .unwrap();

        let set: usize = display
            .framebuffer()
            .bytes()
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum();
        assert_eq!(set, 1);
        assert_eq!(display.framebuffer().pixel(WIDTH - 1, 0), Some(true));
    }
}
