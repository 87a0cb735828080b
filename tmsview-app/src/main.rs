use std::sync::Arc;
use tmsview::{
    layers::vector_tile::RemoteVectorGridPlugin,
    ui::{TileTextures, UiMapExt},
    HttpTileJsonClient, RasterMapView, Route, Router, TileJsonClient, VectorMapView, ViewerConfig,
};

/// Viewer for the tile service; the first argument is the route to open
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ViewerConfig::from_env()?;
    let client: Arc<dyn TileJsonClient> = Arc::new(HttpTileJsonClient::new(config.fetch.clone())?);
    let path = std::env::args().nth(1).unwrap_or_else(|| Route::VectorTms.path().to_string());
    let runtime = tokio::runtime::Handle::current();

    log::info!("tile service at {}", config.tile_service_base);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("tmsview"),
        ..Default::default()
    };

    eframe::run_native(
        "tmsview",
        options,
        Box::new(move |_cc| Box::new(ViewerApp::new(config, client, runtime, &path))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with an error: {}", e))?;

    Ok(())
}

enum ActiveView {
    Vector(VectorMapView),
    Raster(RasterMapView),
    NotFound(String),
}

struct ViewerApp {
    config: ViewerConfig,
    client: Arc<dyn TileJsonClient>,
    runtime: tokio::runtime::Handle,
    router: Router,
    route: Option<Route>,
    view: ActiveView,
    tiles: TileTextures,
}

impl ViewerApp {
    fn new(
        config: ViewerConfig,
        client: Arc<dyn TileJsonClient>,
        runtime: tokio::runtime::Handle,
        path: &str,
    ) -> Self {
        let mut app = Self {
            config,
            client,
            runtime,
            router: Router::new(),
            route: None,
            view: ActiveView::NotFound(path.to_string()),
            tiles: TileTextures::new(),
        };
        app.navigate(path);
        app
    }

    /// Replaces the current view; the old one is dropped, which cancels its
    /// fetch if it still runs
    fn navigate(&mut self, path: &str) {
        self.route = self.router.resolve(path);
        self.tiles = TileTextures::new();
        self.view = match self.route {
            Some(Route::VectorTms) => {
                let mut view =
                    VectorMapView::new(self.config.clone(), Arc::new(RemoteVectorGridPlugin));
                let _guard = self.runtime.enter();
                if let Err(e) = view.mount(self.client.clone()) {
                    log::error!("could not start the TileJSON fetch: {}", e);
                }
                ActiveView::Vector(view)
            }
            Some(Route::RasterTms) => match RasterMapView::new(&self.config) {
                Ok(view) => ActiveView::Raster(view),
                Err(e) => {
                    log::error!("raster view unavailable: {}", e);
                    ActiveView::NotFound(path.to_string())
                }
            },
            None => {
                log::warn!("no view for path `{}`", path);
                ActiveView::NotFound(path.to_string())
            }
        };
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("routes").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut target = None;
                for route in Route::ALL {
                    if ui
                        .selectable_label(self.route == Some(route), route.title())
                        .clicked()
                        && self.route != Some(route)
                    {
                        target = Some(route);
                    }
                }
                if let Some(route) = target {
                    self.navigate(route.path());
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| match &mut self.view {
                ActiveView::Vector(view) => ui.vector_view(view, &mut self.tiles),
                ActiveView::Raster(view) => {
                    ui.raster_view(view, &mut self.tiles);
                }
                ActiveView::NotFound(path) => {
                    ui.centered_and_justified(|ui| {
                        ui.label(format!("No view for `{}`", path));
                    });
                }
            });
    }
}
