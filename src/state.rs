//! Shared application state for all routes.

use crate::contract::ContractService;
use crate::menu::MenuService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub menus: MenuService,
    pub contracts: ContractService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        AppState {
            menus: MenuService::new(pool.clone()),
            contracts: ContractService::new(pool.clone()),
            pool,
        }
    }
}
