use super::*;
use crate::WS_PATH;
use crate::presence::LogSink;
use crate::presence::PresenceSink;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;

pub struct Server;

impl Server {
    pub async fn run(config: Config) -> anyhow::Result<()> {
        let hub = web::Data::new(Hub::new(Self::sink(&config).await?));
        let assets = web::Data::new(Assets::new(config.assets.clone()));
        log::info!("voice room server listening on {}", config.bind);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(hub.clone())
                .app_data(assets.clone())
                .route(WS_PATH, web::get().to(socket))
                .route("/health", web::get().to(health))
                .default_service(web::get().to(asset))
        })
        .workers(config.workers)
        .bind(&config.bind)?
        .run()
        .await?;
        Ok(())
    }

    async fn sink(config: &Config) -> anyhow::Result<Arc<dyn PresenceSink>> {
        match config.database.as_deref() {
            #[cfg(feature = "database")]
            Some(url) => Ok(Arc::new(crate::presence::PostgresSink::connect(url).await?)),
            #[cfg(not(feature = "database"))]
            Some(_) => {
                log::warn!("DB_URL set but built without database support, presence is logged only");
                Ok(Arc::new(LogSink))
            }
            None => Ok(Arc::new(LogSink)),
        }
    }
}

/// Upgrades to the signaling socket. Anything that is not an upgrade is
/// served like any other path.
async fn socket(
    hub: web::Data<Hub>,
    assets: web::Data<Assets>,
    body: web::Payload,
    req: HttpRequest,
) -> HttpResponse {
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => {
            actix_web::rt::spawn(bridge(hub.into_inner(), session, stream));
            response
        }
        Err(e) => {
            log::debug!("no upgrade on {}: {}", req.path(), e);
            asset(assets, req).await
        }
    }
}

async fn health(hub: web::Data<Hub>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "rooms": hub
            .rooms()
            .census()
            .await
            .into_iter()
            .collect::<std::collections::BTreeMap<_, _>>(),
        "peers": hub.peers().len().await,
    }))
}
