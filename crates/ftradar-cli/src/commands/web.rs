use anyhow::Result;
use ftradar_core::RadarConfig;

pub(super) fn serve(config: &RadarConfig, host: &str, port: u16) -> Result<()> {
    ftradar_web::serve_web(config.clone(), host, port)
}
