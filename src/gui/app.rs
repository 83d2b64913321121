use std::path::PathBuf;
use std::sync::Arc;

use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Alignment::Center, Element, Length, Task, Theme};
use rfd::AsyncFileDialog;

use crate::detection::{DetectionOutput, Detector};
use crate::models::Detection;

use super::message::Message;
use super::state::{AppState, Phase, to_handle};

const TITLE: &str = "Engineering Drawing Detector";

/// Launch the viewer with an already-loaded detector.
///
/// The hosting process loads the weights before this runs, so a missing
/// model is reported at startup rather than mid-session.
pub fn run(detector: Detector, conf_threshold: f32) -> iced::Result {
    let detector = Arc::new(detector);
    iced::application(
        move || AppState::new(detector.clone(), conf_threshold),
        update,
        view,
    )
    .title(TITLE)
    .theme(|_state: &AppState| Theme::Dark)
    .run()
}

fn update(state: &mut AppState, message: Message) -> Task<Message> {
    match message {
        Message::OpenImage => Task::perform(
            AsyncFileDialog::new()
                .set_title("Upload an engineering drawing image")
                .add_filter("Images", &["png", "jpg", "jpeg"])
                .pick_file(),
            |handle| Message::ImagePicked(handle.map(|file| file.path().to_path_buf())),
        ),
        Message::ImagePicked(None) => Task::none(),
        Message::ImagePicked(Some(path)) => {
            Task::perform(decode_image(path), Message::ImageDecoded)
        }
        Message::ImageDecoded(Err(error)) => {
            state.phase = Phase::Failed { original: None, error };
            Task::none()
        }
        Message::ImageDecoded(Ok(img)) => {
            state.phase = Phase::Running {
                original: to_handle(&img),
            };
            let detector = state.detector.clone();
            let threshold = state.conf_threshold;
            Task::perform(
                async move {
                    detector
                        .run_detection(&img, threshold)
                        .map_err(|e| e.to_string())
                },
                Message::DetectionFinished,
            )
        }
        Message::DetectionFinished(result) => {
            let phase = std::mem::take(&mut state.phase);
            state.phase = finish_detection(phase, result);
            Task::none()
        }
    }
}

/// Phase transition for a finished detection pass. Pure so it can be
/// exercised without a loaded detector; stale completions (anything but
/// `Running`) leave the phase alone.
fn finish_detection(phase: Phase, result: Result<DetectionOutput, String>) -> Phase {
    match (phase, result) {
        (Phase::Running { original }, Ok(output)) => Phase::Done {
            original,
            annotated: to_handle(&output.annotated),
            detections: output.detections,
        },
        (Phase::Running { original }, Err(error)) => Phase::Failed {
            original: Some(original),
            error: format!("Error running detection: {error}"),
        },
        (other, _) => other,
    }
}

async fn decode_image(path: PathBuf) -> Result<image::RgbImage, String> {
    image::ImageReader::open(&path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .decode()
        .map(|img| img.to_rgb8())
        .map_err(|e| format!("Failed to decode {}: {e}", path.display()))
}

fn view(state: &AppState) -> Element<'_, Message> {
    match &state.phase {
        Phase::Idle => idle_view(),
        Phase::Running { original } => running_view(original),
        Phase::Done {
            original,
            annotated,
            detections,
        } => done_view(original, annotated, detections),
        Phase::Failed { original, error } => failed_view(original.as_ref(), error),
    }
}

fn open_button() -> Element<'static, Message> {
    button("Open image...").on_press(Message::OpenImage).into()
}

fn idle_view() -> Element<'static, Message> {
    let content = column![
        text(TITLE).size(32),
        text("No image uploaded yet."),
        open_button(),
    ]
    .spacing(20)
    .padding(20)
    .align_x(Center);

    container(content)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn running_view(original: &iced::widget::image::Handle) -> Element<'_, Message> {
    let content = column![
        text("Original image").size(24),
        iced::widget::image(original.clone()).width(Length::Fill),
        text("Running detection..."),
    ]
    .spacing(20)
    .padding(20)
    .align_x(Center);

    container(scrollable(content))
        .center_x(Length::Fill)
        .into()
}

fn done_view<'a>(
    original: &'a iced::widget::image::Handle,
    annotated: &'a iced::widget::image::Handle,
    detections: &'a [Detection],
) -> Element<'a, Message> {
    let images = column![
        text("Original image").size(24),
        iced::widget::image(original.clone()).width(Length::Fill),
        text("Annotated detections").size(24),
        iced::widget::image(annotated.clone()).width(Length::Fill),
    ]
    .spacing(10);

    let content = column![
        row![text(TITLE).size(32), open_button()].spacing(20),
        row![
            scrollable(images).width(Length::FillPortion(3)),
            container(summary_view(detections)).width(Length::FillPortion(2)),
        ]
        .spacing(20),
    ]
    .spacing(20)
    .padding(20);

    container(content).into()
}

fn summary_view(detections: &[Detection]) -> Element<'_, Message> {
    let mut list = column![text("Detections summary").size(24)].spacing(8);

    if detections.is_empty() {
        list = list.push(text("No detections."));
    } else {
        list = list.push(text(format!("Total detections: {}", detections.len())));
        for (i, det) in detections.iter().enumerate() {
            list = list.push(
                text(format!(
                    "[{i}] class={}  conf={:.2}  box=({}, {}, {}, {})",
                    det.class_name,
                    det.confidence,
                    det.bbox.x1,
                    det.bbox.y1,
                    det.bbox.x2,
                    det.bbox.y2,
                ))
                .size(14),
            );
        }
    }

    scrollable(list).into()
}

fn failed_view<'a>(
    original: Option<&'a iced::widget::image::Handle>,
    error: &'a str,
) -> Element<'a, Message> {
    let mut content = column![
        text(TITLE).size(32),
        text(error.to_string()),
        open_button(),
    ]
    .spacing(20)
    .padding(20)
    .align_x(Center);

    if let Some(original) = original {
        content = content.push(iced::widget::image(original.clone()).width(Length::Fill));
    }

    container(scrollable(content))
        .center_x(Length::Fill)
        .into()
}
