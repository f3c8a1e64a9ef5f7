//! CLI command implementations

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::App;
use crate::auth::Permission;
use crate::cli::{
    confirm, error, info, print_session, print_todo_detail, print_todo_table, print_user_table,
    spinner, success, warn, OutputFormat, TodoAction,
};
use crate::config::{self, loader::CONFIG_FILENAME};
use crate::routing::Route;
use crate::signature::{self, Point, RasterSurface, SignatureCapture};
use crate::todos::{self, Pager, Todo};

/// Initialize a new todoclient.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Run 'todo-client login <username>' to sign in");

    Ok(())
}

pub async fn register(username: &str, email: &str, password: Option<String>) -> Result<()> {
    let app = load_app()?;
    let password = password_or_prompt(password, true)?;

    let pb = spinner("Registering...");
    let result = app.session.register(username, email, &password).await;
    pb.finish_and_clear();

    match result {
        Ok(session) => {
            success(&format!(
                "Registered and signed in as {} ({})",
                session.user.username, session.user.role
            ));
            Ok(())
        }
        Err(e) => {
            error(&format!("Registration failed: {}", e));
            Err(e.into())
        }
    }
}

pub async fn login(username: &str, password: Option<String>) -> Result<()> {
    let app = load_app()?;

    // Login view is behind the anti-guard
    let location = app.navigator.navigate(Route::Login.path());
    if location.route != Route::Login {
        info(&format!(
            "Already signed in as {}; run 'todo-client logout' first",
            app.session
                .current_user()
                .map(|u| u.username)
                .unwrap_or_default()
        ));
        return Ok(());
    }

    let password = password_or_prompt(password, false)?;

    let pb = spinner("Signing in...");
    let result = app.session.login(username, &password).await;
    pb.finish_and_clear();

    match result {
        Ok(session) => {
            success(&format!(
                "Signed in as {} ({})",
                session.user.username, session.user.role
            ));
            let destination = app.navigator.post_login_destination();
            app.navigator.navigate(&destination);
            Ok(())
        }
        Err(e) => {
            error(&format!("Login failed: {}", e));
            Err(e.into())
        }
    }
}

pub async fn logout() -> Result<()> {
    let app = load_app()?;
    if app.session.current_user().is_none() {
        info("Not signed in");
    }
    app.session.logout();
    success("Signed out");
    Ok(())
}

pub async fn refresh() -> Result<()> {
    let app = load_app()?;

    let pb = spinner("Refreshing token...");
    let result = app.client.refresh_session().await;
    pb.finish_and_clear();

    match result {
        Ok(_) => {
            success(&format!(
                "Token refreshed, valid for {}",
                crate::cli::format_remaining(app.session.token_expiry_remaining())
            ));
            Ok(())
        }
        Err(e) => {
            error(&format!("Refresh failed: {}", e));
            Err(e.into())
        }
    }
}

pub async fn whoami(format: OutputFormat) -> Result<()> {
    let app = load_app()?;

    let Some(session) = app.session.current_session() else {
        info("Not signed in");
        return Ok(());
    };
    let permissions = app.session.permissions();

    match format {
        OutputFormat::Table => {
            print_session(&session, &permissions, app.session.token_expiry_remaining())
        }
        OutputFormat::Json => {
            let value = serde_json::json!({ "session": session, "permissions": permissions });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Yaml => {
            let value = serde_json::json!({ "session": session, "permissions": permissions });
            println!("{}", serde_yaml::to_string(&value)?);
        }
    }

    Ok(())
}

pub async fn open(path: &str) -> Result<()> {
    let app = load_app()?;
    let location = app.navigator.navigate(path);

    if location.url == path {
        success(&format!("{} allowed", path));
    } else {
        warn(&format!("{} redirected to {}", path, location.url));
    }
    if let Some(return_url) = location.return_url {
        info(&format!("Will return to {} after login", return_url));
    }
    Ok(())
}

pub async fn todos(action: TodoAction) -> Result<()> {
    let app = load_app()?;
    require_route(&app, Route::Todos)?;

    match action {
        TodoAction::List { page, size, format } => {
            let size = size.unwrap_or(app.config.todos.page_size);
            let result = app.todos.list(page, size).await?;
            let mut pager = Pager::new(size);
            pager.go_to(page);
            pager.update_from(&result);

            match format {
                OutputFormat::Table => print_todo_table(&result, &pager),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&result)?),
            }
        }
        TodoAction::Get { id, format } => {
            let todo = app.todos.get(id).await?;
            match format {
                OutputFormat::Table => print_todo_detail(&todo),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&todo)?),
                OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&todo)?),
            }
        }
        TodoAction::Create {
            title,
            description,
            completed,
        } => {
            require_permission(&app, Permission::CreateTodo)?;
            let mut todo = Todo::new(title);
            todo.description = description;
            todo.completed = completed;
            todo.username = app.session.current_user().map(|u| u.username);

            let created = app.todos.create(&todo).await?;
            success(&format!(
                "Created todo {}",
                created.id.map(|i| i.to_string()).unwrap_or_default()
            ));
        }
        TodoAction::Update {
            id,
            title,
            description,
            completed,
        } => {
            require_permission(&app, Permission::EditTodo)?;
            let mut todo = app.todos.get(id).await?;
            if let Some(title) = title {
                todo.title = title;
            }
            if description.is_some() {
                todo.description = description;
            }
            if let Some(completed) = completed {
                todo.completed = completed;
            }
            app.todos.update(id, &todo).await?;
            success(&format!("Updated todo {}", id));
        }
        TodoAction::Delete { id, force } => {
            require_permission(&app, Permission::DeleteTodo)?;
            if !force && !confirm(&format!("Delete todo {}?", id)) {
                info("Cancelled");
                return Ok(());
            }
            app.todos.delete(id).await?;
            success(&format!("Deleted todo {}", id));
        }
        TodoAction::Sync => {
            require_permission(&app, Permission::SyncTodos)?;
            let pb = spinner("Synchronizing...");
            let result = app.todos.sync().await;
            pb.finish_and_clear();
            let message = result?;
            success(&format!("Synchronization complete: {}", message));
        }
        TodoAction::Users { format } => {
            let users = app.todos.list_users().await?;
            match format {
                OutputFormat::Table => print_user_table(&users),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
                OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&users)?),
            }
        }
        TodoAction::Pdf { id, output } => {
            require_permission(&app, Permission::ExportPdf)?;
            let bytes = app.todos.todo_pdf(id).await?;
            let path = download_path(&app, output, &todos::todo_pdf_filename(id));
            write_download(&path, &bytes)?;
        }
        TodoAction::UsersPdf { output } => {
            require_permission(&app, Permission::ExportPdf)?;
            let bytes = app.todos.users_pdf().await?;
            let path = download_path(&app, output, todos::users_pdf_filename());
            write_download(&path, &bytes)?;
        }
    }

    Ok(())
}

pub async fn sign(id: i64, strokes_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let app = load_app()?;
    require_route(&app, Route::Todos)?;
    require_permission(&app, Permission::ExportPdf)?;

    let content = fs::read_to_string(strokes_path)
        .with_context(|| format!("Failed to read {}", strokes_path.display()))?;
    let strokes: Vec<Vec<Point>> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a stroke list", strokes_path.display()))?;
    if strokes.iter().all(|s| s.len() < 2) {
        bail!("Stroke file contains no drawable strokes");
    }

    let surface = RasterSurface::from_config(&app.config.signature);
    let mut capture = SignatureCapture::with_surface(id, surface);
    signature::replay(&mut capture, &strokes)?;
    let signed = capture.finish()?;

    let pb = spinner("Generating signed PDF...");
    let result = app.todos.signed_todo_pdf(&signed).await;
    pb.finish_and_clear();

    let bytes = result?;
    let path = download_path(&app, output, &todos::signed_todo_pdf_filename(id));
    write_download(&path, &bytes)
}

fn load_app() -> Result<App> {
    let config = config::load_config_or_default()?;
    Ok(App::from_config(config)?)
}

/// Fail unless the guards let the session reach `route`
fn require_route(app: &App, route: Route) -> Result<()> {
    let location = app.navigator.navigate(route.path());
    match location.route {
        r if r == route => Ok(()),
        Route::Login => bail!("Not signed in. Run 'todo-client login <username>' first"),
        _ => bail!("Access to {} is forbidden", route),
    }
}

fn require_permission(app: &App, permission: Permission) -> Result<()> {
    if app.session.has_permission(permission) {
        Ok(())
    } else {
        bail!("Your role does not grant {}", permission)
    }
}

fn password_or_prompt(password: Option<String>, confirmation: bool) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirmation {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

fn download_path(app: &App, output: Option<PathBuf>, filename: &str) -> PathBuf {
    output.unwrap_or_else(|| app.config.todos.download_dir.join(filename))
}

fn write_download(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    success(&format!("Saved {} ({} bytes)", path.display(), bytes.len()));
    Ok(())
}
