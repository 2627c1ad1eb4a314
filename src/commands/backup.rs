//! Server backup schedule commands.

use crate::api::{ApiClient, BackupApi};
use crate::cli::{
    BackupAction, BackupCommand, GlobalArgs, ScheduleAction, ScheduleDeleteArgs,
    ScheduleDescribeArgs, ScheduleListArgs,
};
use crate::error::CliError;
use crate::models::BackupSchedule;
use crate::output::{self, OutputFormat, Printer, Table};
use crate::validate;

#[derive(Debug)]
struct ListInputModel {
    project_id: String,
    server_id: String,
    limit: Option<i64>,
    output_format: OutputFormat,
}

#[derive(Debug)]
struct ScheduleInputModel {
    project_id: String,
    server_id: String,
    schedule_id: String,
    output_format: OutputFormat,
    assume_yes: bool,
}

pub async fn run(
    cmd: BackupCommand,
    global: &GlobalArgs,
    p: &Printer,
    base_url: Option<&str>,
) -> Result<(), CliError> {
    let BackupAction::Schedule(schedule) = cmd.action;
    match schedule.action {
        ScheduleAction::List(args) => {
            let model = parse_list_input(&args, global)?;
            p.debug_model(&model);
            let client = ApiClient::configure(base_url)?;
            list(&model, &client, p).await
        }
        ScheduleAction::Describe(args) => {
            let model = parse_describe_input(&args, global)?;
            p.debug_model(&model);
            let client = ApiClient::configure(base_url)?;
            describe(&model, &client, p).await
        }
        ScheduleAction::Delete(args) => {
            let model = parse_delete_input(&args, global)?;
            p.debug_model(&model);
            if !model.assume_yes {
                p.prompt_for_confirmation(&format!(
                    "Are you sure you want to delete backup schedule {} of server {}?",
                    model.schedule_id, model.server_id
                ))?;
            }
            let client = ApiClient::configure(base_url)?;
            delete(&model, &client, p).await
        }
    }
}

fn parse_list_input(args: &ScheduleListArgs, global: &GlobalArgs) -> Result<ListInputModel, CliError> {
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

fn parse_describe_input(
    args: &ScheduleDescribeArgs,
    global: &GlobalArgs,
) -> Result<ScheduleInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::uuid("server-id", &args.server_id)?;
    Ok(ScheduleInputModel {
        project_id,
        server_id: args.server_id.clone(),
        schedule_id: args.schedule_id.clone(),
        output_format: global.output_format,
        assume_yes: global.assume_yes,
    })
}

fn parse_delete_input(
    args: &ScheduleDeleteArgs,
    global: &GlobalArgs,
) -> Result<ScheduleInputModel, CliError> {
    let project_id = validate::project_id(global)?;
    validate::uuid("server-id", &args.server_id)?;
    Ok(ScheduleInputModel {
        project_id,
        server_id: args.server_id.clone(),
        schedule_id: args.schedule_id.clone(),
        output_format: global.output_format,
        assume_yes: global.assume_yes,
    })
}

async fn list<C: BackupApi>(model: &ListInputModel, client: &C, p: &Printer) -> Result<(), CliError> {
    let mut schedules = client
        .list_backup_schedules(&model.project_id, &model.server_id)
        .await
        .map_err(|e| CliError::execution("list backup schedules", e))?;

    if schedules.is_empty() {
        p.outputln(&format!(
            "No backup schedules found for server {}",
            model.server_id
        ));
        return Ok(());
    }

    output::truncate(&mut schedules, model.limit);
    output_list(p, model.output_format, &schedules)
}

async fn describe<C: BackupApi>(
    model: &ScheduleInputModel,
    client: &C,
    p: &Printer,
) -> Result<(), CliError> {
    let schedule = client
        .get_backup_schedule(&model.project_id, &model.server_id, &model.schedule_id)
        .await
        .map_err(|e| CliError::execution("describe backup schedule", e))?;
    output_single(p, model.output_format, &schedule)
}

async fn delete<C: BackupApi>(
    model: &ScheduleInputModel,
    client: &C,
    p: &Printer,
) -> Result<(), CliError> {
    client
        .delete_backup_schedule(&model.project_id, &model.server_id, &model.schedule_id)
        .await
        .map_err(|e| CliError::execution("delete backup schedule", e))?;
    p.outputln(&format!(
        "Deleted backup schedule {} of server {}",
        model.schedule_id, model.server_id
    ));
    Ok(())
}

fn output_list(p: &Printer, format: OutputFormat, schedules: &[BackupSchedule]) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let details = output::render_json(&schedules)
                .map_err(|e| CliError::render("marshal backup schedules", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Yaml => {
            let details = output::render_yaml(&schedules)
                .map_err(|e| CliError::render("marshal backup schedules", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Table => {
            build_list_table(schedules).display(p);
            Ok(())
        }
    }
}

fn output_single(p: &Printer, format: OutputFormat, schedule: &BackupSchedule) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let details = output::render_json(schedule)
                .map_err(|e| CliError::render("marshal backup schedule", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Yaml => {
            let details = output::render_yaml(schedule)
                .map_err(|e| CliError::render("marshal backup schedule", e))?;
            p.outputln(&details);
            Ok(())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.add_row(vec!["ID".into(), schedule.id.clone()]);
            table.add_row(vec!["NAME".into(), schedule.name.clone()]);
            table.add_row(vec!["ENABLED".into(), schedule.enabled.to_string()]);
            table.add_row(vec!["RRULE".into(), schedule.rrule.clone()]);
            table.add_row(vec![
                "BACKUP NAME".into(),
                schedule.backup_properties.name.clone(),
            ]);
            table.add_row(vec![
                "RETENTION DAYS".into(),
                schedule.backup_properties.retention_period.to_string(),
            ]);
            table.add_row(vec!["VOLUME IDS".into(), joined_volume_ids(schedule)]);
            table.display(p);
            Ok(())
        }
    }
}

fn build_list_table(schedules: &[BackupSchedule]) -> Table {
    let mut table = Table::new();
    table.set_header(&[
        "SCHEDULE ID",
        "NAME",
        "ENABLED",
        "RRULE",
        "BACKUP NAME",
        "RETENTION DAYS",
        "VOLUME IDS",
    ]);
    for schedule in schedules {
        table.add_row(vec![
            schedule.id.clone(),
            schedule.name.clone(),
            schedule.enabled.to_string(),
            schedule.rrule.clone(),
            schedule.backup_properties.name.clone(),
            schedule.backup_properties.retention_period.to_string(),
            joined_volume_ids(schedule),
        ]);
    }
    table
}

fn joined_volume_ids(schedule: &BackupSchedule) -> String {
    schedule
        .backup_properties
        .volume_ids
        .as_deref()
        .map(|ids| ids.join(","))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::ApiError;
    use crate::models::BackupProperties;

    const PROJECT_ID: &str = "9b3f7a2e-4c1d-4e8a-b0f3-2d9c5a71e604";
    const SERVER_ID: &str = "5f2c8a90-11de-4f60-9d2a-7b64c3f0a1ce";

    #[derive(Default)]
    struct StubApi {
        schedules: Vec<BackupSchedule>,
        calls: AtomicUsize,
    }

    impl BackupApi for StubApi {
        async fn list_backup_schedules(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Vec<BackupSchedule>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.schedules.clone())
        }

        async fn get_backup_schedule(
            &self,
            _: &str,
            _: &str,
            schedule_id: &str,
        ) -> Result<BackupSchedule, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.schedules
                .iter()
                .find(|s| s.id == schedule_id)
                .cloned()
                .ok_or(ApiError::Service {
                    status: 404,
                    message: "schedule not found".into(),
                })
        }

        async fn delete_backup_schedule(&self, _: &str, _: &str, _: &str) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn schedule(id: &str, volume_ids: Option<Vec<String>>) -> BackupSchedule {
        BackupSchedule {
            id: id.into(),
            name: format!("schedule-{id}"),
            enabled: true,
            rrule: "DTSTART;TZID=UTC:20240101T010000 RRULE:FREQ=DAILY".into(),
            backup_properties: BackupProperties {
                name: format!("backup-{id}"),
                retention_period: 14,
                volume_ids,
            },
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

    fn list_args(server_id: &str, limit: Option<i64>) -> ScheduleListArgs {
        ScheduleListArgs {
            server_id: server_id.into(),
            limit,
        }
    }

    #[test]
    fn list_rejects_non_positive_limit() {
        for bad in [0, -7] {
            let err =
                parse_list_input(&list_args(SERVER_ID, Some(bad)), &global(Some(PROJECT_ID)))
                    .unwrap_err();
            assert!(err.to_string().contains("--limit"));
        }
    }

    #[test]
    fn list_rejects_malformed_server_id() {
        let err = parse_list_input(&list_args("not-a-uuid", None), &global(Some(PROJECT_ID)))
            .unwrap_err();
        assert!(err.to_string().contains("server-id"));
    }

    #[test]
    fn list_requires_project_id() {
        let err = parse_list_input(&list_args(SERVER_ID, None), &global(None)).unwrap_err();
        assert!(matches!(err, CliError::MissingProjectId));
    }

    #[tokio::test]
    async fn invalid_input_makes_no_api_calls() {
        let stub = StubApi::default();
        let p = Printer::test();
        // Same shape as run(): parse first, execute only on success.
        let result = match parse_list_input(&list_args(SERVER_ID, Some(0)), &global(Some(PROJECT_ID)))
        {
            Ok(model) => list(&model, &stub, &p).await,
            Err(e) => Err(e),
        };
        assert!(result.is_err());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_result_prints_only_the_scope_message() {
        let stub = StubApi::default();
        let p = Printer::test();
        let model = parse_list_input(&list_args(SERVER_ID, None), &global(Some(PROJECT_ID))).unwrap();
        list(&model, &stub, &p).await.unwrap();
        assert_eq!(
            p.captured(),
            format!("No backup schedules found for server {SERVER_ID}\n")
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn limit_truncates_to_first_entries_in_server_order() {
        let stub = StubApi {
            schedules: vec![
                schedule("1", None),
                schedule("2", None),
                schedule("3", None),
            ],
            calls: AtomicUsize::new(0),
        };
        let p = Printer::test();
        let model =
            parse_list_input(&list_args(SERVER_ID, Some(2)), &global(Some(PROJECT_ID))).unwrap();
        list(&model, &stub, &p).await.unwrap();

        let out = p.captured();
        // Header, separator, and exactly two data rows.
        assert_eq!(out.trim_end().lines().count(), 4);
        assert!(out.contains("schedule-1"));
        assert!(out.contains("schedule-2"));
        assert!(!out.contains("schedule-3"));
    }

    #[tokio::test]
    async fn list_failure_carries_action_context() {
        struct FailingApi;
        impl BackupApi for FailingApi {
            async fn list_backup_schedules(
                &self,
                _: &str,
                _: &str,
            ) -> Result<Vec<BackupSchedule>, ApiError> {
                Err(ApiError::Service {
                    status: 500,
                    message: "boom".into(),
                })
            }
            async fn get_backup_schedule(
                &self,
                _: &str,
                _: &str,
                _: &str,
            ) -> Result<BackupSchedule, ApiError> {
                unreachable!()
            }
            async fn delete_backup_schedule(&self, _: &str, _: &str, _: &str) -> Result<(), ApiError> {
                unreachable!()
            }
        }
        let p = Printer::test();
        let model = parse_list_input(&list_args(SERVER_ID, None), &global(Some(PROJECT_ID))).unwrap();
        let err = list(&model, &FailingApi, &p).await.unwrap_err();
        assert!(err.to_string().starts_with("list backup schedules:"));
    }

    #[test]
    fn absent_volume_ids_render_as_empty_cell() {
        let table = build_list_table(&[schedule("1", None)]);
        let rendered = table.render();
        let row = rendered.lines().last().unwrap();
        // Row ends after the retention column; the volume column is empty.
        assert!(row.trim_end().ends_with("14"));
    }

    #[test]
    fn present_volume_ids_are_comma_joined() {
        let table = build_list_table(&[schedule(
            "1",
            Some(vec!["vol-a".into(), "vol-b".into()]),
        )]);
        assert_eq!(table.row_count(), 1);
        assert!(table.render().contains("vol-a,vol-b"));
    }

    #[tokio::test]
    async fn json_list_output_parses_back_to_the_same_values() {
        let stub = StubApi {
            schedules: vec![schedule("1", Some(vec!["vol-a".into()]))],
            calls: AtomicUsize::new(0),
        };
        let p = Printer::test();
        let mut global = global(Some(PROJECT_ID));
        global.output_format = OutputFormat::Json;
        let model = parse_list_input(&list_args(SERVER_ID, None), &global).unwrap();
        list(&model, &stub, &p).await.unwrap();

        let decoded: Vec<BackupSchedule> = serde_json::from_str(&p.captured()).unwrap();
        assert_eq!(decoded, stub.schedules);
    }

    #[tokio::test]
    async fn describe_renders_key_value_rows() {
        let stub = StubApi {
            schedules: vec![schedule("5", None)],
            calls: AtomicUsize::new(0),
        };
        let p = Printer::test();
        let args = ScheduleDescribeArgs {
            server_id: SERVER_ID.into(),
            schedule_id: "5".into(),
        };
        let model = parse_describe_input(&args, &global(Some(PROJECT_ID))).unwrap();
        describe(&model, &stub, &p).await.unwrap();
        let out = p.captured();
        assert!(out.contains("ID"));
        assert!(out.contains("schedule-5"));
        assert!(out.contains("RETENTION DAYS"));
    }
}
