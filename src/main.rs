use iced::widget::{button, column, container, image, row, text, Column};
use iced::widget::image::Image;
use iced::{Alignment, Color, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use photo_restorer::download::{default_download_dir, save_result};
use photo_restorer::encoder::ACCEPTED_EXTENSIONS;
use photo_restorer::runtime;
use photo_restorer::{
    Config, GeminiClient, Phase, RestoreError, Restorer, Session, SessionAction, SessionEvent,
};

/// Main application state
struct PhotoRestorer {
    /// The restore workflow
    session: Session,
    /// Restoration service client
    restorer: Arc<dyn Restorer>,
    /// Decoded restored image, rebuilt whenever the session's result changes
    restored_preview: Option<image::Handle>,
    /// Outcome of the last save, shown under the buttons
    save_notice: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the upload area
    PickFile,
    /// User clicked "Restore Photo"
    Restore,
    /// User clicked "Upload New Photo"
    Reset,
    /// User clicked "Download Restored Image"
    Download,
    /// Background encode/restore finished
    Completed(SessionEvent),
    /// Background save finished
    Saved(Result<PathBuf, RestoreError>),
}

impl PhotoRestorer {
    /// Create a new instance of the application
    fn new(config: Config) -> (Self, Task<Message>) {
        let client = GeminiClient::new(&config);
        tracing::info!("🎨 Photo Restorer ready, using {}", client.url());

        (
            PhotoRestorer {
                session: Session::new(),
                restorer: Arc::new(client),
                restored_preview: None,
                save_notice: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFile => {
                // Show the native file picker; the filter is a hint, not validation
                let file = FileDialog::new()
                    .set_title("Select an Old Photo")
                    .add_filter("Images", &ACCEPTED_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => self.dispatch(SessionEvent::UploadRequested { path }),
                    None => Task::none(),
                }
            }
            Message::Restore => self.dispatch(SessionEvent::RestoreRequested),
            Message::Reset => self.dispatch(SessionEvent::ResetRequested),
            Message::Completed(event) => self.dispatch(event),
            Message::Download => self.download(),
            Message::Saved(outcome) => {
                self.save_notice = Some(match outcome {
                    Ok(path) => format!("Saved to {}", path.display()),
                    Err(e) => e.to_string(),
                });
                Task::none()
            }
        }
    }

    /// Feed an event to the session and start whatever work it asks for
    fn dispatch(&mut self, event: SessionEvent) -> Task<Message> {
        let actions = self.session.handle(event);
        self.sync_preview();
        self.run(actions)
    }

    fn run(&self, actions: Vec<SessionAction>) -> Task<Message> {
        Task::batch(actions.into_iter().map(|action| {
            Task::perform(
                runtime::perform(action, self.restorer.clone()),
                Message::Completed,
            )
        }))
    }

    /// Keep the decoded preview in step with the session's result
    fn sync_preview(&mut self) {
        match self.session.result() {
            Some(result) if self.restored_preview.is_none() => match result.decode() {
                Ok(bytes) => self.restored_preview = Some(image::Handle::from_bytes(bytes)),
                Err(e) => tracing::warn!("⚠️  Could not decode restored image: {}", e),
            }
            Some(_) => {}
            None => {
                self.restored_preview = None;
                self.save_notice = None;
            }
        }
    }

    /// Ask where to save the result, then write it in the background
    fn download(&mut self) -> Task<Message> {
        let (Some(result), Some(file_name)) = (self.session.result(), self.session.download_name())
        else {
            return Task::none();
        };

        let mut dialog = FileDialog::new()
            .set_title("Save Restored Image")
            .set_file_name(file_name.as_str());
        if let Some(dir) = default_download_dir() {
            dialog = dialog.set_directory(dir);
        }

        let Some(destination) = dialog.save_file() else {
            return Task::none();
        };

        let result = result.clone();
        Task::perform(
            async move { save_result(&result, &destination).await.map(|_| destination) },
            Message::Saved,
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content: Column<Message> = column![
            text("Photo Restorer").size(40),
            text(self.session.status_message()).size(18),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        if let Some(error) = self.session.error_message() {
            content = content.push(
                text(format!("Error: {error}"))
                    .size(16)
                    .color(Color::from_rgb(0.99, 0.65, 0.65)),
            );
        }

        content = match self.session.uploaded_image() {
            None => content.push(self.upload_area()),
            Some(original) => content.push(
                column![
                    row![
                        image_card(
                            "Original",
                            preview(image::Handle::from_path(&original.source_path)),
                        ),
                        image_card("Restored", self.restored_panel()),
                    ]
                    .spacing(24),
                    self.controls(),
                ]
                .spacing(20)
                .align_x(Alignment::Center),
            ),
        };

        if let Some(notice) = &self.save_notice {
            content = content.push(text(notice.as_str()).size(14));
        }

        content = content.push(
            text("Powered by Gemini AI. Created for demonstration purposes.")
                .size(12)
                .color(Color::from_rgb(0.6, 0.6, 0.6)),
        );

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn upload_area(&self) -> Element<Message> {
        let label = if self.session.phase() == Phase::Preparing {
            "Processing..."
        } else {
            "Click to upload a photo"
        };

        column![
            button(text(label).size(20))
                .on_press_maybe(self.session.can_upload().then_some(Message::PickFile))
                .padding(20),
            text("PNG, JPG, or WEBP").size(14),
        ]
        .spacing(10)
        .align_x(Alignment::Center)
        .into()
    }

    fn restored_panel(&self) -> Element<Message> {
        match (&self.restored_preview, self.session.phase()) {
            (_, Phase::Restoring) => text("Restoring Image...").into(),
            (Some(handle), _) => preview(handle.clone()),
            (None, _) => text("Your restored image will appear here.").into(),
        }
    }

    fn controls(&self) -> Element<Message> {
        let primary = if self.session.result().is_some() {
            button("Download Restored Image").on_press(Message::Download)
        } else {
            let label = if self.session.is_busy() { "Restoring..." } else { "Restore Photo" };
            button(label).on_press_maybe(self.session.can_restore().then_some(Message::Restore))
        };

        // Reset stays enabled while restoring; a late answer is dropped by the session
        row![
            button("Upload New Photo").on_press(Message::Reset).padding(10),
            primary.padding(10),
        ]
        .spacing(16)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Scaled-to-fit image widget
fn preview<'a>(handle: image::Handle) -> Element<'a, Message> {
    Image::<image::Handle>::new(handle)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Titled panel holding one of the two images
fn image_card<'a>(title: &'a str, body: Element<'a, Message>) -> Element<'a, Message> {
    column![
        text(title).size(20),
        container(body)
            .width(Length::Fixed(420.0))
            .height(Length::Fixed(420.0))
            .center_x(Length::Fixed(420.0))
            .center_y(Length::Fixed(420.0)),
    ]
    .spacing(10)
    .align_x(Alignment::Center)
    .into()
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("photo_restorer=info")),
        )
        .init();

    // Without a credential the app cannot do anything useful
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    iced::application("Photo Restorer", PhotoRestorer::update, PhotoRestorer::view)
        .theme(PhotoRestorer::theme)
        .centered()
        .run_with(move || PhotoRestorer::new(config))
}
