use skin_painter::{LaunchOptions, SkinPainterApp};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = LaunchOptions::from_args();
    let session = match options.resolve() {
        Ok(session) => session,
        Err(err) => {
            log::error!("{err}");
            eprintln!("skin-painter: {err}");
            std::process::exit(2);
        }
    };
    log::info!(
        "opening {} at {}x{}",
        session.title,
        session.config.width,
        session.config.height
    );

    let native = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Skin Painter",
        native,
        Box::new(|cc| Ok(Box::new(SkinPainterApp::new(cc, session)))),
    )
}
