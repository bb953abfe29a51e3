// Learn more about Tauri commands at https://tauri.app/develop/calling-rust/

use std::sync::{Arc, Mutex, MutexGuard};

use tauri::State;
use tauri_plugin_shell::ShellExt;

mod catalog;
mod sync;

use catalog::entry::{Entry, EntryDraft, EntryFilter};
use catalog::store::CatalogStore;
use sync::remote::RemoteStore;
use sync::{SharedManager, SyncManager, SyncStatus};

fn locked<'a>(state: &'a State<'_, SharedManager>) -> Result<MutexGuard<'a, SyncManager>, String> {
    state.lock().map_err(|_| "state lock poisoned".to_string())
}

#[tauri::command]
fn list_entries(state: State<'_, SharedManager>, filter: EntryFilter) -> Result<Vec<Entry>, String> {
    Ok(locked(&state)?.list(&filter))
}

#[tauri::command]
fn add_entry(state: State<'_, SharedManager>, draft: EntryDraft) -> Result<Entry, String> {
    locked(&state)?.add(draft).map_err(|e| e.to_string())
}

#[tauri::command]
fn edit_entry(
    state: State<'_, SharedManager>,
    id: String,
    draft: EntryDraft,
) -> Result<Entry, String> {
    locked(&state)?.edit(&id, draft).map_err(|e| e.to_string())
}

#[tauri::command]
fn delete_entry(state: State<'_, SharedManager>, id: String) -> Result<(), String> {
    locked(&state)?.delete(&id).map_err(|e| e.to_string())
}

#[tauri::command]
fn open_entry(
    app: tauri::AppHandle,
    state: State<'_, SharedManager>,
    id: String,
) -> Result<(), String> {
    let url = locked(&state)?.entry_url(&id).map_err(|e| e.to_string())?;
    app.shell().open(url, None).map_err(|e| e.to_string())
}

#[tauri::command]
fn set_sync_key(state: State<'_, SharedManager>, key: String) -> Result<(), String> {
    locked(&state)?.set_key(&key).map_err(|e| e.to_string())?;
    sync::spawn_pull(state.inner().clone());
    Ok(())
}

#[tauri::command]
fn generate_sync_key(state: State<'_, SharedManager>) -> Result<String, String> {
    let key = locked(&state)?.generate_key().map_err(|e| e.to_string())?;
    sync::spawn_pull(state.inner().clone());
    Ok(key)
}

#[tauri::command]
fn clear_sync_key(state: State<'_, SharedManager>) -> Result<(), String> {
    locked(&state)?.clear_key().map_err(|e| e.to_string())
}

#[tauri::command]
fn force_pull(state: State<'_, SharedManager>) -> Result<(), String> {
    sync::spawn_pull(state.inner().clone());
    Ok(())
}

#[tauri::command]
fn sync_status(state: State<'_, SharedManager>) -> Result<SyncStatus, String> {
    Ok(locked(&state)?.status())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let store = CatalogStore::open_default().expect("cannot open catalog storage");
    let manager: SharedManager = Arc::new(Mutex::new(SyncManager::open(
        store,
        RemoteStore::from_env(),
    )));
    let startup = manager.clone();

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .target(tauri_plugin_log::Target::new(
                    tauri_plugin_log::TargetKind::Webview,
                ))
                .build(),
        )
        .plugin(tauri_plugin_shell::init())
        .manage(manager)
        .setup(move |_app| {
            // Pull-on-connect for a key saved in a previous session; a
            // no-op when sync was never configured.
            sync::spawn_pull(startup);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            list_entries,
            add_entry,
            edit_entry,
            delete_entry,
            open_entry,
            set_sync_key,
            generate_sync_key,
            clear_sync_key,
            force_pull,
            sync_status
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
