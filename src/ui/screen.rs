//! ST7735 LCD wrapper - executes draw commands.
//!
//! All rendering *decisions* happen in `display_logic`; this module
//! only turns `RenderDirective`s into embedded-graphics calls, keeping
//! the shipped panel layout: status strip along the top (battery left,
//! Bluetooth rune and unit suffix right), readout centered below.

use core::fmt::Write as _;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::display_logic::{RenderDirective, TemperatureLayout};
use crate::error::Error;
use display_interface_spi::SPIInterface;
use embassy_nrf::gpio::Output;
use embassy_nrf::peripherals::SPI3;
use embassy_nrf::spim::Spim;
use embassy_time::{Delay, Duration, Timer};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::iso_8859_1::FONT_9X15;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::Text;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use mipidsi::models::ST7735s;
use mipidsi::Builder;

/// Battery/Bluetooth outline color.
const GREY: Rgb565 = Rgb565::new(15, 31, 15);

/// Type alias for the concrete panel driver.
pub type Screen<'d> = mipidsi::Display<
    SPIInterface<ExclusiveDevice<Spim<'d, SPI3>, Output<'d>, NoDelay>, Output<'d>>,
    ST7735s,
    Output<'d>,
>;

/// Initialise the ST7735 and blank it.
pub fn init<'d>(
    spi: Spim<'d, SPI3>,
    cs: Output<'d>,
    dc: Output<'d>,
    rst: Output<'d>,
) -> Result<Screen<'d>, Error> {
    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).map_err(|_| Error::Display)?;
    let di = SPIInterface::new(spi_device, dc);

    let mut display = Builder::new(ST7735s, di)
        .reset_pin(rst)
        .display_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
        .init(&mut Delay)
        .map_err(|_| Error::Display)?;

    let _ = display.clear(Rgb565::BLACK);
    Ok(display)
}

/// Apply draw commands in emitted order.
///
/// Async because the intro animation paces itself with timer delays;
/// everything else completes synchronously.
pub async fn apply<D>(display: &mut D, directives: &[RenderDirective])
where
    D: DrawTarget<Color = Rgb565>,
{
    for directive in directives {
        match *directive {
            RenderDirective::DrawTemperature {
                value,
                unit_suffix,
                layout,
            } => draw_temperature(display, value, unit_suffix, layout),
            RenderDirective::DrawBattery { percentage } => draw_battery(display, percentage),
            RenderDirective::DrawCharging => draw_charging(display),
            RenderDirective::ClearBatteryArea => {
                blank(display, Point::new(8, 8), Size::new(66, 16))
            }
            RenderDirective::DrawBluetoothIcon => draw_bluetooth_icon(display),
            RenderDirective::ClearBluetoothIcon => {
                blank(display, Point::new(80, 7), Size::new(14, 19))
            }
            RenderDirective::ClearScreen => {
                let _ = display.clear(Rgb565::BLACK);
            }
            RenderDirective::PlayIntroAnimation => play_intro(display).await,
        }
    }
}

fn readout_style() -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyleBuilder::new()
        .font(&FONT_10X20)
        .text_color(Rgb565::WHITE)
        .build()
}

fn suffix_style() -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyleBuilder::new()
        .font(&FONT_9X15)
        .text_color(Rgb565::WHITE)
        .build()
}

fn label_style() -> MonoTextStyle<'static, Rgb565> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(Rgb565::WHITE)
        .build()
}

fn blank<D>(display: &mut D, top_left: Point, size: Size)
where
    D: DrawTarget<Color = Rgb565>,
{
    let _ = Rectangle::new(top_left, size)
        .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
        .draw(display);
}

/// Repaint the readout area.
///
/// The large layout starts further left so three digits fit; it has no
/// suffix to draw (the directive already carries `None` there).
fn draw_temperature<D>(
    display: &mut D,
    value: f64,
    unit_suffix: Option<char>,
    layout: TemperatureLayout,
) where
    D: DrawTarget<Color = Rgb565>,
{
    blank(display, Point::new(0, 30), Size::new(128, 98));

    let origin = match layout {
        TemperatureLayout::Default => Point::new(20, 72),
        TemperatureLayout::Large => Point::new(10, 72),
    };

    let mut text: heapless::String<12> = heapless::String::new();
    let _ = write!(text, "{:.1}", value);
    let _ = Text::new(&text, origin, readout_style()).draw(display);

    if let Some(unit) = unit_suffix {
        let mut suffix: heapless::String<4> = heapless::String::new();
        let _ = write!(suffix, "°{}", unit);
        let _ = Text::new(&suffix, Point::new(98, 18), suffix_style()).draw(display);
    }
}

/// Battery outline + tip, shared by the bar and the charging glyph.
fn draw_battery_shell<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    let outline = PrimitiveStyle::with_stroke(GREY, 1);
    let _ = Rectangle::new(Point::new(8, 10), Size::new(20, 12))
        .into_styled(outline)
        .draw(display);
    let _ = Rectangle::new(Point::new(28, 13), Size::new(2, 6))
        .into_styled(outline)
        .draw(display);
}

/// Numeric battery bar: proportional fill + percentage text.
fn draw_battery<D>(display: &mut D, percentage: u8)
where
    D: DrawTarget<Color = Rgb565>,
{
    draw_battery_shell(display);

    // 18 interior pixels for 100 %, so ~5.26 % per pixel.
    let fill = u32::from(percentage) * 100 / 526;
    if fill > 0 {
        let _ = Rectangle::new(Point::new(9, 11), Size::new(fill, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
            .draw(display);
    }

    let mut text: heapless::String<8> = heapless::String::new();
    let _ = write!(text, "{}%", percentage);
    let _ = Text::new(&text, Point::new(34, 19), label_style()).draw(display);
}

/// "On charger" glyph: the shell filled solid green, no numbers.
fn draw_charging<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    draw_battery_shell(display);

    let _ = Rectangle::new(Point::new(9, 11), Size::new(18, 10))
        .into_styled(PrimitiveStyle::with_fill(Rgb565::GREEN))
        .draw(display);
}

/// Bluetooth rune: two stacked triangles with a crossing stroke.
fn draw_bluetooth_icon<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    let stroke = PrimitiveStyle::with_stroke(Rgb565::WHITE, 1);

    let _ = Triangle::new(Point::new(86, 8), Point::new(92, 13), Point::new(86, 17))
        .into_styled(stroke)
        .draw(display);
    let _ = Triangle::new(Point::new(86, 24), Point::new(92, 19), Point::new(86, 15))
        .into_styled(stroke)
        .draw(display);
    let _ = Line::new(Point::new(86, 15), Point::new(80, 11))
        .into_styled(stroke)
        .draw(display);
    let _ = Line::new(Point::new(86, 17), Point::new(80, 21))
        .into_styled(stroke)
        .draw(display);
}

/// Boot animation: wordmark, then the thermometer logo traced stroke
/// by stroke, held for a few seconds before the panel is handed over
/// to live data.
async fn play_intro<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    const STROKES: [((i32, i32), (i32, i32)); 16] = [
        ((80, 35), (10, 35)),
        ((10, 35), (10, 50)),
        ((10, 50), (30, 50)),
        ((30, 50), (30, 100)),
        ((30, 100), (10, 100)),
        ((10, 100), (10, 115)),
        ((10, 115), (80, 115)),
        ((80, 115), (100, 100)),
        ((100, 100), (100, 50)),
        ((100, 50), (80, 35)),
        ((70, 35), (70, 50)),
        ((70, 50), (50, 50)),
        ((50, 50), (50, 100)),
        ((50, 100), (70, 100)),
        ((70, 100), (70, 115)),
        ((70, 115), (80, 115)),
    ];

    let stroke = PrimitiveStyle::with_stroke(Rgb565::WHITE, 1);

    let _ = Text::new("TempID", Point::new(10, 20), readout_style()).draw(display);

    let _ = Circle::with_center(Point::new(113, 40), 21)
        .into_styled(stroke)
        .draw(display);
    Timer::after(Duration::from_millis(80)).await;

    for (from, to) in STROKES {
        let _ = Line::new(Point::new(from.0, from.1), Point::new(to.0, to.1))
            .into_styled(stroke)
            .draw(display);
        Timer::after(Duration::from_millis(80)).await;
    }

    Timer::after(Duration::from_secs(4)).await;
    let _ = display.clear(Rgb565::BLACK);
}
