use crate::liboboeru::deck::{DeckError, LEARNED_RANK, RANK_NAMES};
use crate::liboboeru::session::{Intent, Mark, Session, Snapshot};
use crate::Error;
use eframe::egui;
use eframe::egui::{Color32, FontData, Key, RichText, Ui};
use eframe::epaint::text::{FontInsert, InsertFontFamily};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

const TITLE: &str = "覚える!";

/// Common CJK font locations, tried when no `--font` is given.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
    "C:\\Windows\\Fonts\\YuGothR.ttc",
];

struct GuiState {
    session: Session,
    snapshot: Snapshot,
}

impl GuiState {
    fn new(session: Session) -> Self {
        let snapshot = session.snapshot();
        Self { session, snapshot }
    }

    fn keyboard_intent(ctx: &egui::Context) -> Option<Intent> {
        ctx.input(|i| {
            if i.key_pressed(Key::Space) {
                Some(Intent::Reveal)
            } else if i.key_pressed(Key::G) || i.key_pressed(Key::ArrowRight) {
                Some(Intent::Mark(Mark::Good))
            } else if i.key_pressed(Key::B) || i.key_pressed(Key::ArrowLeft) {
                Some(Intent::Mark(Mark::Bad))
            } else {
                None
            }
        })
    }

    fn draw_progress(&self, ui: &mut Ui) {
        let snap = &self.snapshot;
        ui.horizontal(|ui| {
            for rank in 0..LEARNED_RANK {
                ui.label(format!("{}: {}", RANK_NAMES[rank as usize], snap.counts[rank as usize]));
                ui.separator();
            }
            ui.label(
                RichText::new(format!(
                    "{}: {}/{}",
                    RANK_NAMES[LEARNED_RANK as usize],
                    snap.learned(),
                    snap.total
                ))
                .strong(),
            );
        });
    }

    fn draw_card(&self, ui: &mut Ui) -> Option<Intent> {
        let snap = &self.snapshot;
        let mut intent = None;

        ui.vertical_centered(|ui| {
            ui.label(format!("{}/{}", snap.position + 1, snap.total));
            ui.add_space(20.0);
            if let Some(front) = &snap.front {
                ui.label(RichText::new(front).size(40.0));
            }
            ui.add_space(12.0);
            match &snap.back {
                Some(back) => {
                    ui.label(RichText::new(back).size(28.0).color(Color32::LIGHT_GREEN));
                }
                None => {
                    ui.label(RichText::new("?").size(28.0).weak());
                }
            }
            ui.add_space(20.0);

            let reveal_text = if snap.revealed {
                "Hide answer"
            } else {
                "Show answer"
            };
            if ui.button(reveal_text).clicked() {
                intent = Some(Intent::Reveal);
            }
            ui.horizontal(|ui| {
                if ui.button(RichText::new("Bad").color(Color32::LIGHT_RED)).clicked() {
                    intent = Some(Intent::Mark(Mark::Bad));
                }
                if ui.button(RichText::new("Good").color(Color32::LIGHT_GREEN)).clicked() {
                    intent = Some(Intent::Mark(Mark::Good));
                }
            });
        });

        intent
    }
}

impl eframe::App for GuiState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("progress").show(ctx, |ui| self.draw_progress(ui));

        let mut intent = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.snapshot.total == 0 {
                ui.heading("This deck has no cards.");
                ui.label("Every line of the deck file should look like `front|::|back`.");
            } else if self.snapshot.completed {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading(RichText::new("Congratulations!").size(36.0));
                    ui.label("You have learned all the flashcards.");
                });
            } else {
                intent = self.draw_card(ui).or_else(|| Self::keyboard_intent(ctx));
            }
        });

        if let Some(intent) = intent {
            debug!("[GUI] intent: {:?}", intent);
            self.snapshot = self.session.handle_intent(intent);
        }
    }
}

struct LoadFailed {
    message: String,
}

impl eframe::App for LoadFailed {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(RichText::new("Failed to load flashcards").color(Color32::LIGHT_RED));
            ui.add_space(8.0);
            ui.label(self.message.as_str());
        });
    }
}

fn native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 360.0])
            .with_min_inner_size([300.0, 220.0]),
        ..Default::default()
    }
}

/// First candidate that can be read, preferring `user` over [`SYSTEM_FONTS`].
fn find_font(user: Option<&Path>) -> Option<(PathBuf, Vec<u8>)> {
    let candidates = user
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONTS.iter().map(PathBuf::from));
    for path in candidates {
        match std::fs::read(&path) {
            Ok(bytes) => return Some((path, bytes)),
            Err(err) => debug!("[GUI] No font at {:?}: {}", path, err),
        }
    }
    None
}

fn add_fonts(cc: &eframe::CreationContext, user: Option<&Path>) {
    let Some((path, bytes)) = find_font(user) else {
        warn!("[GUI] No CJK font found. Pass one with --font to render kana and kanji.");
        return;
    };
    info!("[GUI] Using font {:?}", path);
    cc.egui_ctx.add_font(FontInsert::new(
        "oboeru-extra",
        FontData::from_owned(bytes),
        vec![InsertFontFamily {
            family: egui::FontFamily::Proportional,
            priority: egui::epaint::text::FontPriority::Lowest,
        }],
    ));
}

pub fn init_gui(session: Session, font: Option<&Path>) -> Result<(), Error> {
    info!("[GUI] Opening study window");
    eframe::run_native(
        TITLE,
        native_options(),
        Box::new(|cc| {
            add_fonts(cc, font);
            Ok(Box::new(GuiState::new(session)))
        }),
    )?;

    Ok(())
}

/// Shown instead of the study view when the deck could not be read.
pub fn show_load_failure(err: &DeckError, font: Option<&Path>) -> Result<(), Error> {
    let message = err.to_string();
    eframe::run_native(
        TITLE,
        native_options(),
        Box::new(|cc| {
            add_fonts(cc, font);
            Ok(Box::new(LoadFailed { message }))
        }),
    )?;

    Ok(())
}
