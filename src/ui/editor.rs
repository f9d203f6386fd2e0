/// Editor tab: sliders and buttons bound to the parameter set
///
/// Slider positions live here while the user drags; only the release
/// commits a value to the session.
use iced::widget::{button, column, row, slider, text, Column};
use iced::{Element, Length};

use image_viewer::state::edit::{Adjustment, EditParams, Field, TransformOp};
use image_viewer::state::session::Session;
use crate::Message;

/// One slider on the editor tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Brightness,
    Contrast,
    Hue,
    Saturation,
    Red,
    Green,
    Blue,
    Sepia,
    Blur,
}

impl Slider {
    pub fn field(self) -> Field {
        match self {
            Slider::Brightness => Field::Brightness,
            Slider::Contrast => Field::Contrast,
            Slider::Hue => Field::Hue,
            Slider::Saturation => Field::Saturation,
            Slider::Red | Slider::Green | Slider::Blue => Field::ColorBalance,
            Slider::Sepia => Field::Sepia,
            Slider::Blur => Field::Blur,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Slider::Brightness => "Brightness",
            Slider::Contrast => "Contrast",
            Slider::Hue => "Hue",
            Slider::Saturation => "Saturation",
            Slider::Red => "Red",
            Slider::Green => "Green",
            Slider::Blue => "Blue",
            Slider::Sepia => "Sepia",
            Slider::Blur => "Blur",
        }
    }
}

/// Current slider positions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sliders {
    brightness: f32,
    contrast: f32,
    hue: f32,
    saturation: f32,
    red: f32,
    green: f32,
    blue: f32,
    sepia: f32,
    blur: f32,
}

impl Sliders {
    pub fn from_params(params: &EditParams) -> Self {
        let [red, green, blue] = params.color_balance;
        Self {
            brightness: params.brightness,
            contrast: params.contrast,
            hue: params.hue,
            saturation: params.saturation,
            red,
            green,
            blue,
            sepia: params.sepia,
            blur: params.blur,
        }
    }

    pub fn get(&self, slider: Slider) -> f32 {
        match slider {
            Slider::Brightness => self.brightness,
            Slider::Contrast => self.contrast,
            Slider::Hue => self.hue,
            Slider::Saturation => self.saturation,
            Slider::Red => self.red,
            Slider::Green => self.green,
            Slider::Blue => self.blue,
            Slider::Sepia => self.sepia,
            Slider::Blur => self.blur,
        }
    }

    pub fn set(&mut self, slider: Slider, value: f32) {
        let target = match slider {
            Slider::Brightness => &mut self.brightness,
            Slider::Contrast => &mut self.contrast,
            Slider::Hue => &mut self.hue,
            Slider::Saturation => &mut self.saturation,
            Slider::Red => &mut self.red,
            Slider::Green => &mut self.green,
            Slider::Blue => &mut self.blue,
            Slider::Sepia => &mut self.sepia,
            Slider::Blur => &mut self.blur,
        };
        *target = value;
    }

    /// The value committed when `slider` is released
    ///
    /// Color balance always carries all three channels.
    pub fn adjustment(&self, slider: Slider) -> Adjustment {
        match slider {
            Slider::Brightness => Adjustment::Brightness(self.brightness),
            Slider::Contrast => Adjustment::Contrast(self.contrast),
            Slider::Hue => Adjustment::Hue(self.hue),
            Slider::Saturation => Adjustment::Saturation(self.saturation),
            Slider::Red | Slider::Green | Slider::Blue => {
                Adjustment::ColorBalance([self.red, self.green, self.blue])
            }
            Slider::Sepia => Adjustment::Sepia(self.sepia),
            Slider::Blur => Adjustment::Blur(self.blur),
        }
    }
}

fn slider_row<'a>(sliders: &Sliders, kind: Slider, enabled: bool) -> Element<'a, Message> {
    let value = sliders.get(kind);
    let range = kind.field().range().unwrap_or(0.0..=0.0);

    let control: Element<'a, Message> = if enabled {
        slider(range, value, move |v| Message::SliderMoved(kind, v))
            .on_release(Message::SliderReleased(kind))
            .step(1.0)
            .into()
    } else {
        slider(range, value, |_| Message::Noop).step(1.0).into()
    };

    column![text(format!("{}: {:.0}", kind.label(), value)).size(14), control]
        .spacing(4)
        .into()
}

fn section<'a>(title: &'a str, rows: Vec<Element<'a, Message>>) -> Element<'a, Message> {
    let mut content = Column::new().spacing(10).push(text(title).size(18));
    for r in rows {
        content = content.push(r);
    }
    content.into()
}

/// Build the editor tab
pub fn view<'a>(session: Option<&'a Session>, sliders: &Sliders) -> Element<'a, Message> {
    let enabled = session.is_some();
    let on = |message: Message| enabled.then_some(message);

    let general = section(
        "General",
        vec![
            slider_row(sliders, Slider::Brightness, enabled),
            slider_row(sliders, Slider::Contrast, enabled),
            slider_row(sliders, Slider::Hue, enabled),
            slider_row(sliders, Slider::Saturation, enabled),
        ],
    );

    let color_balance = section(
        "Color Balance",
        vec![
            slider_row(sliders, Slider::Red, enabled),
            slider_row(sliders, Slider::Green, enabled),
            slider_row(sliders, Slider::Blue, enabled),
        ],
    );

    let transform = section(
        "Transform",
        vec![
            button("Rotate 90°")
                .on_press_maybe(on(Message::Transform(TransformOp::Rotate90)))
                .width(Length::Fill)
                .into(),
            button("Flip Horizontally")
                .on_press_maybe(on(Message::Transform(TransformOp::FlipHorizontal)))
                .width(Length::Fill)
                .into(),
            button("Flip Vertically")
                .on_press_maybe(on(Message::Transform(TransformOp::FlipVertical)))
                .width(Length::Fill)
                .into(),
        ],
    );

    let grayscale = session.map_or(false, |s| s.latest_params().grayscale);
    let filter = section(
        "Filter",
        vec![
            slider_row(sliders, Slider::Sepia, enabled),
            slider_row(sliders, Slider::Blur, enabled),
            button(if grayscale { "Grayscale: on" } else { "Grayscale: off" })
                .on_press_maybe(on(Message::ToggleGrayscale))
                .width(Length::Fill)
                .into(),
        ],
    );

    let can_reset = session.map_or(false, Session::can_reset);
    let reset = button("Reset All")
        .on_press_maybe(can_reset.then_some(Message::Reset))
        .width(Length::Fill);

    column![
        general,
        color_balance,
        transform,
        filter,
        row![reset].padding([10, 0]),
    ]
    .spacing(20)
    .into()
}
