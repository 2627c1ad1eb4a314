//! Server OS update commands. Update creation is always asynchronous on the
//! service side; the CLI only reports the triggered update ID.

use crate::api::{ApiClient, UpdateApi};
use crate::cli::{GlobalArgs, UpdateAction, UpdateCommand, UpdateCreateArgs, UpdateListArgs};
use crate::error::CliError;
use crate::models::{CreateUpdatePayload, Update};
use crate::output::{self, OutputFormat, Printer, Table};
use crate::validate;

#[derive(Debug)]
struct CreateInputModel {
    project_id: String,
    server_id: String,
    maintenance_window: i64,
    output_format: OutputFormat,
    assume_yes: bool,
}

#[derive(Debug)]
struct ListInputModel {
    project_id: String,
    server_id: String,
    limit: Option<i64>,
    output_format: OutputFormat,
}

pub async fn run(
    cmd: UpdateCommand,
    global: &GlobalArgs,
    p: &Printer,
    base_url: Option<&str>,
) -> Result<(), CliError> {
    match cmd.action {
        UpdateAction::Create(args) => {
            let model = parse_create_input(&args, global)?;
            p.debug_model(&model);
            if !model.assume_yes {
                p.prompt_for_confirmation(&format!(
                    "Are you sure you want to create an OS update for server {}?",
                    model.server_id
                ))?;
            }
            let client = ApiClient::configure(base_url)?;
            create(&model, &client, p).await
        }
        UpdateAction::List(args) => {
            let model = parse_list_input(&args, global)?;
            p.debug_model(&model);
            let client = ApiClient::configure(base_url)?;
            list(&model, &client, p).await
        }
    }
}

fn parse_create_input(
    args: &UpdateCreateArgs,
    global: &GlobalArgs,
) -> Result<CreateInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::uuid("server-id", &args.server_id)?;
    validate::maintenance_window(args.maintenance_window)?;
    Ok(CreateInputModel {
        project_id,
        server_id: args.server_id.clone(),
        maintenance_window: args.maintenance_window,
        output_format: global.output_format,
        assume_yes: global.assume_yes,
    })
}

fn parse_list_input(args: &UpdateListArgs, global: &GlobalArgs) -> Result<ListInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::uuid("server-id", &args.server_id)?;
    validate::limit(args.limit)?;
    Ok(ListInputModel {
        project_id,
        server_id: args.server_id.clone(),
        limit: args.limit,
        output_format: global.output_format,
    })
}

/// InputModel to wire payload; pure, no I/O.
fn build_create_payload(model: &CreateInputModel) -> CreateUpdatePayload {
    CreateUpdatePayload {
        maintenance_window: model.maintenance_window,
    }
}

async fn create<C: UpdateApi>(
    model: &CreateInputModel,
    client: &C,
    p: &Printer,
) -> Result<(), CliError> {
    let payload = build_create_payload(model);
    let update = client
        .create_update(&model.project_id, &model.server_id, &payload)
        .await
        .map_err(|e| CliError::execution("create server OS update", e))?;
    output_created(p, model, &update)
}

async fn list<C: UpdateApi>(model: &ListInputModel, client: &C, p: &Printer) -> Result<(), CliError> {
    let mut updates = client
        .list_updates(&model.project_id, &model.server_id)
        .await
        .map_err(|e| CliError::execution("list server OS updates", e))?;

    if updates.is_empty() {
        p.outputln(&format!("No OS updates found for server {}", model.server_id));
        return Ok(());
    }

    output::truncate(&mut updates, model.limit);
    output_list(p, model.output_format, &updates)
}

fn output_created(p: &Printer, model: &CreateInputModel, update: &Update) -> Result<(), CliError> {
    match model.output_format {
        OutputFormat::Json => {
            let details = output::render_json(update)
                .map_err(|e| CliError::render("marshal server OS update", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Yaml => {
            let details = output::render_yaml(update)
                .map_err(|e| CliError::render("marshal server OS update", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Table => {
            p.outputln(&format!(
                "Triggered OS update for server {}. Update ID: {}",
                model.server_id, update.id
            ));
            Ok(())
        }
    }
}

fn output_list(p: &Printer, format: OutputFormat, updates: &[Update]) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let details = output::render_json(&updates)
                .map_err(|e| CliError::render("marshal server OS updates", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Yaml => {
            let details = output::render_yaml(&updates)
                .map_err(|e| CliError::render("marshal server OS updates", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(&["UPDATE ID", "STATUS", "START DATE", "MAINTENANCE WINDOW"]);
            for update in updates {
                table.add_row(vec![
                    update.id.to_string(),
                    update.status.clone().unwrap_or_default(),
                    update.start_date.clone().unwrap_or_default(),
                    update
                        .maintenance_window
                        .map(|w| w.to_string())
                        .unwrap_or_default(),
                ]);
            }
            table.display(p);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::ApiError;

    const PROJECT_ID: &str = "9b3f7a2e-4c1d-4e8a-b0f3-2d9c5a71e604";
    const SERVER_ID: &str = "5f2c8a90-11de-4f60-9d2a-7b64c3f0a1ce";

    #[derive(Default)]
    struct StubApi {
        updates: Vec<Update>,
        calls: AtomicUsize,
    }

    impl UpdateApi for StubApi {
        async fn create_update(
            &self,
            _: &str,
            _: &str,
            payload: &CreateUpdatePayload,
        ) -> Result<Update, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Update {
                id: 42,
                status: Some("scheduled".into()),
                start_date: None,
                maintenance_window: Some(payload.maintenance_window),
            })
        }

        async fn list_updates(&self, _: &str, _: &str) -> Result<Vec<Update>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.updates.clone())
        }
    }

    fn global(project_id: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            project_id: project_id.map(str::to_string),
            output_format: OutputFormat::Table,
            assume_yes: true,
            verbose: false,
        }
    }

    fn create_args(window: i64) -> UpdateCreateArgs {
        UpdateCreateArgs {
            server_id: SERVER_ID.into(),
            maintenance_window: window,
        }
    }

    #[test]
    fn create_rejects_out_of_range_window() {
        for bad in [0, 25, -3] {
            let err = parse_create_input(&create_args(bad), &global(Some(PROJECT_ID))).unwrap_err();
            assert!(err.to_string().contains("maintenance-window"));
            assert!(err.to_string().contains("between 1 and 24"));
        }
    }

    #[test]
    fn create_accepts_window_bounds() {
        assert!(parse_create_input(&create_args(1), &global(Some(PROJECT_ID))).is_ok());
        assert!(parse_create_input(&create_args(24), &global(Some(PROJECT_ID))).is_ok());
    }

    #[test]
    fn payload_carries_the_window() {
        let model = parse_create_input(&create_args(13), &global(Some(PROJECT_ID))).unwrap();
        assert_eq!(build_create_payload(&model).maintenance_window, 13);
    }

    #[tokio::test]
    async fn out_of_range_window_makes_no_api_calls() {
        let stub = StubApi::default();
        let p = Printer::test();
        let result = match parse_create_input(&create_args(25), &global(Some(PROJECT_ID))) {
            Ok(model) => create(&model, &stub, &p).await,
            Err(e) => Err(e),
        };
        assert!(result.is_err());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn default_output_names_the_triggered_update() {
        let stub = StubApi::default();
        let p = Printer::test();
        let model = parse_create_input(&create_args(13), &global(Some(PROJECT_ID))).unwrap();
        create(&model, &stub, &p).await.unwrap();
        assert_eq!(
            p.captured(),
            format!("Triggered OS update for server {SERVER_ID}. Update ID: 42\n")
        );
    }

    #[tokio::test]
    async fn empty_update_list_prints_scope_message() {
        let stub = StubApi::default();
        let p = Printer::test();
        let args = UpdateListArgs {
            server_id: SERVER_ID.into(),
            limit: None,
        };
        let model = parse_list_input(&args, &global(Some(PROJECT_ID))).unwrap();
        list(&model, &stub, &p).await.unwrap();
        assert_eq!(
            p.captured(),
            format!("No OS updates found for server {SERVER_ID}\n")
        );
    }
}
