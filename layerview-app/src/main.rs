use anyhow::Context;
use crossbeam_channel::{unbounded, Receiver, Sender};
use layerview::{
    run_lookup,
    runtime::{self, spawners::tokio_impl::TokioSpawner},
    ui::{LayerPanel, MapCanvas},
    AttributeFetcher, FetchTicket, HttpAttributeFetcher, MapEvent, ViewerConfig, ViewerSession,
};
use std::{path::Path, sync::Arc, time::Duration};

const CONFIG_ENV: &str = "LAYERVIEW_CONFIG";

/// Desktop viewer. The first argument (or `LAYERVIEW_CONFIG`) may name a
/// JSON config file; without one the built-in addresses are used.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = load_config()?;
    runtime::init_runtime(Box::new(TokioSpawner::current()));

    let session = ViewerSession::from_config(&config).context("invalid layer catalog")?;
    let fetcher =
        HttpAttributeFetcher::with_timeout(&config.attribute_endpoint, config.request_timeout())
            .context("invalid attribute endpoint")?;
    log::info!(
        "{} layers, attribute lookups against {}",
        session.registry().len(),
        fetcher.endpoint()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Layerview"),
        ..Default::default()
    };

    eframe::run_native(
        "layerview-app",
        options,
        Box::new(move |cc| Box::new(ViewerApp::new(cc, config, session, Arc::new(fetcher)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with an error: {}", e))?;

    Ok(())
}

fn load_config() -> anyhow::Result<ViewerConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());
    match path {
        Some(path) => ViewerConfig::from_json_file(&path)
            .with_context(|| format!("failed to load config from {}", path)),
        None => Ok(ViewerConfig::default()),
    }
}

fn install_font(ctx: &egui::Context, path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("labels".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("labels".to_owned());
    }
    ctx.set_fonts(fonts);
    Ok(())
}

struct ViewerApp {
    session: ViewerSession,
    canvas: MapCanvas,
    panel: LayerPanel,
    fetcher: Arc<dyn AttributeFetcher>,
    /// Finished lookups come back on this channel
    events_tx: Sender<MapEvent>,
    events_rx: Receiver<MapEvent>,
}

impl ViewerApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        config: ViewerConfig,
        session: ViewerSession,
        fetcher: Arc<dyn AttributeFetcher>,
    ) -> Self {
        if let Some(path) = &config.font_path {
            if let Err(e) = install_font(&cc.egui_ctx, path) {
                log::warn!("label font not installed: {:#}", e);
            }
        }

        let mut canvas = MapCanvas::new(&config);
        let report = session.sync(&mut canvas);
        if !report.failed.is_empty() {
            log::warn!("initial sync failed for {:?}", report.failed);
        }

        let (events_tx, events_rx) = unbounded();
        Self {
            session,
            canvas,
            panel: LayerPanel::new(),
            fetcher,
            events_tx,
            events_rx,
        }
    }

    fn dispatch(&mut self, event: MapEvent, ctx: &egui::Context) {
        match self.session.handle(event, &mut self.canvas) {
            Ok(Some(ticket)) => self.start_lookup(ticket, ctx),
            Ok(None) => {}
            Err(e) => log::warn!("event rejected: {}", e),
        }
    }

    fn start_lookup(&self, ticket: FetchTicket, ctx: &egui::Context) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        runtime::spawn(async move {
            let event = run_lookup(fetcher.as_ref(), ticket).await;
            let _ = tx.send(event);
            ctx.request_repaint();
        });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events: Vec<MapEvent> = self.events_rx.try_iter().collect();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if self.session.sidebar_visible() {
                    "إخفاء الطبقات"
                } else {
                    "إظهار الطبقات"
                };
                if ui.button(label).clicked() {
                    events.push(MapEvent::ToggleSidebar);
                }
            });
        });

        if self.session.sidebar_visible() {
            egui::SidePanel::right("layers")
                .resizable(true)
                .default_width(240.0)
                .show(ctx, |ui| {
                    let toggled =
                        self.panel
                            .show(ui, self.session.registry(), self.session.selection());
                    events.extend(toggled.into_iter().map(|id| MapEvent::ToggleLayer { id }));
                });
        }

        let popup = self.session.popup_content();
        let canvas = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas.show(ui, popup.as_ref()))
            .inner;
        if canvas.close_popup {
            events.push(MapEvent::ClosePopup);
        } else if let Some(coordinate) = canvas.clicked {
            events.push(MapEvent::Click { coordinate });
        }

        for event in events {
            self.dispatch(event, ctx);
        }

        if self.canvas.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
