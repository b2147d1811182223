//! Wire configuration to a ready coordinator.

use crate::coordinator::MutationCoordinator;
use crate::error::Result as ServiceResult;

use pv_config::Config;

pub async fn bootstrap(config: &Config) -> ServiceResult<MutationCoordinator> {
    config.validate()?;

    let db_path = config.database_path()?;
    let pool = pv_db::connect(&db_path).await?;

    config.log_summary();

    Ok(MutationCoordinator::new(pool))
}
