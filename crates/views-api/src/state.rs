use std::sync::Arc;

use views_crypto::{CredentialCodec, TokenIssuer};
use views_db::Database;

use crate::policy::AuthorizationPolicy;
use crate::service::accounts::AccountService;
use crate::service::views::ViewService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub accounts: AccountService,
    pub views: ViewService,
    pub tokens: TokenIssuer,
}

impl AppStateInner {
    pub fn new(
        db: Arc<Database>,
        codec: CredentialCodec,
        tokens: TokenIssuer,
        policy: Arc<dyn AuthorizationPolicy>,
    ) -> AppState {
        Arc::new(Self {
            accounts: AccountService::new(db.clone(), codec, tokens.clone(), policy.clone()),
            views: ViewService::new(db, policy),
            tokens,
        })
    }
}
