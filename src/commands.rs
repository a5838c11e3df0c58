use crate::{
    api::KeygenApi,
    err::ErrorSummary,
    models::{License, LicenseStatus, User},
    resources::{LicenseFilters, WEBHOOK_EVENTS},
    session::AuthSession,
};
use tauri::{command, AppHandle, Runtime, State, Window};
use tokio::sync::Mutex;
use tracing::error;

type Result<T> = std::result::Result<T, ErrorSummary>;

#[command]
pub async fn login<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    api: State<'_, Mutex<KeygenApi>>,
    session: State<'_, Mutex<AuthSession>>,
    email: String,
    password: String,
) -> Result<Option<User>> {
    let mut api = api.lock().await;
    let mut session = session.lock().await;

    Ok(session.login(&mut api, &email, &password).await?)
}

#[command]
pub async fn logout<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    api: State<'_, Mutex<KeygenApi>>,
    session: State<'_, Mutex<AuthSession>>,
) -> Result<()> {
    let mut api = api.lock().await;
    let mut session = session.lock().await;

    Ok(session.logout(&mut api)?)
}

#[command]
pub async fn restore_session<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    api: State<'_, Mutex<KeygenApi>>,
    session: State<'_, Mutex<AuthSession>>,
) -> Result<Option<User>> {
    let mut api = api.lock().await;
    let mut session = session.lock().await;

    match session.restore(&mut api).await {
        Ok(user) => Ok(user),
        Err(err) => {
            error!(error = %err, "failed restoring session");
            Err(err.into())
        }
    }
}

#[command]
pub async fn current_user<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    session: State<'_, Mutex<AuthSession>>,
) -> Result<Option<User>> {
    let session = session.lock().await;

    Ok(session.user().cloned())
}

#[command]
pub async fn list_licenses<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    api: State<'_, Mutex<KeygenApi>>,
    status: Option<LicenseStatus>,
    limit: Option<u32>,
    page: Option<u32>,
) -> Result<Vec<License>> {
    let api = api.lock().await;

    let filters = LicenseFilters {
        status,
        limit,
        page,
        ..Default::default()
    };
    let res = api.licenses().list(&filters).await?;

    Ok(res.data.unwrap_or_default())
}

#[command]
pub async fn suspend_license<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    api: State<'_, Mutex<KeygenApi>>,
    id: String,
) -> Result<Option<License>> {
    let api = api.lock().await;

    Ok(api.licenses().suspend(&id).await?.data)
}

#[command]
pub async fn reinstate_license<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    api: State<'_, Mutex<KeygenApi>>,
    id: String,
) -> Result<Option<License>> {
    let api = api.lock().await;

    Ok(api.licenses().reinstate(&id).await?.data)
}

#[command]
pub async fn renew_license<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    api: State<'_, Mutex<KeygenApi>>,
    id: String,
) -> Result<Option<License>> {
    let api = api.lock().await;

    Ok(api.licenses().renew(&id).await?.data)
}

#[command]
pub async fn delete_license<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    api: State<'_, Mutex<KeygenApi>>,
    id: String,
) -> Result<()> {
    let api = api.lock().await;

    Ok(api.licenses().delete(&id).await?)
}

#[command]
pub async fn deactivate_machine<R: Runtime>(
    _app: AppHandle<R>,
    _window: Window<R>,
    api: State<'_, Mutex<KeygenApi>>,
    id: String,
) -> Result<()> {
    let api = api.lock().await;

    Ok(api.machines().deactivate(&id).await?)
}

#[command]
pub async fn webhook_events<R: Runtime>(_app: AppHandle<R>, _window: Window<R>) -> Result<Vec<String>> {
    Ok(WEBHOOK_EVENTS.iter().map(|event| event.to_string()).collect())
}
