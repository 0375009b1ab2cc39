// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use bookscout::config::settings::Settings;
use bookscout::domain::services::search_service::BookSearchService;
use bookscout::engines::reqwest_engine::ReqwestTransport;
use bookscout::engines::retrieval_client::RetrievalClient;
use bookscout::infrastructure::catalog::client::CatalogClient;
use bookscout::infrastructure::storage::cover::CoverDownloader;
use bookscout::presentation::routes;
use bookscout::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting bookscout...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Build the fetch pipeline
    let transport = Arc::new(ReqwestTransport::new(&settings.catalog.user_agents)?);
    let retrieval = RetrievalClient::new(transport, &settings.retrieval);
    info!(
        "Retrieval client ready ({} attempts per request)",
        retrieval.max_attempts()
    );

    let catalog = Arc::new(CatalogClient::from_settings(&settings, retrieval.clone())?);
    let service = Arc::new(BookSearchService::new(catalog));
    let downloader = Arc::new(CoverDownloader::new(retrieval, &settings.cover));
    info!(
        "Covers will be written to {}",
        downloader.output_dir().display()
    );

    // 4. Start HTTP server
    let app = routes::routes(service, downloader, settings.clone());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
