//! CLI command implementations.
//!
//! Translates parsed arguments into command-layer calls and renders the
//! results.


use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::cli::parser::{Cli, Commands, FieldArgs, FilterArgs};
use crate::config::Config;
use crate::core::{
    DisplayOptions, DueDate, DueFilter, ItemFilter, NewReminder, ReminderPatch, parse_due_date,
};
use crate::error::Result;
use crate::output::{Renderer, View};
use crate::service::ReminderService;
use crate::storage::{ReminderStore, SqliteStore};

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
/// * `config` - Resolved configuration (database path, output format).
///
/// # Returns
///
/// Result with output string on success. The string may be empty.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli, config: &Config) -> Result<String> {
    let store = SqliteStore::open(&config.db_path)?;
    let mut service = ReminderService::new(store);
    let now = Local::now().naive_local();
    let renderer = Renderer::new(config.format, now.date());
    run(&mut service, &cli.command, &renderer, now)
}

/// Runs `command` against `service`, rendering with `renderer`.
///
/// `now` anchors relative due dates such as `tomorrow`.
///
/// # Errors
///
/// Returns an error if resolution, parsing, the store or rendering fails.
/// A reminder that `delete` cannot find is logged as a warning instead.
pub fn run<S: ReminderStore>(
    service: &mut ReminderService<S>,
    command: &Commands,
    renderer: &Renderer,
    now: NaiveDateTime,
) -> Result<String> {
    debug!(?command, format = %renderer.format(), "dispatching command");

    match command {
        Commands::ShowLists => {
            let lists = service.show_lists()?;
            render(renderer, View::Lists(&lists), None)
        }
        Commands::ShowAll { filter } => {
            let reminders = service.show_all(&item_filter(filter, now)?)?;
            let view = View::Reminders {
                items: &reminders,
                show_list: true,
            };
            render(renderer, view, None)
        }
        Commands::Show { list, filter } => {
            let (_, reminders) = service.show(list, &item_filter(filter, now)?)?;
            let view = View::Reminders {
                items: &reminders,
                show_list: false,
            };
            render(renderer, view, None)
        }
        Commands::Add { list, text, fields } => {
            let draft = NewReminder {
                title: text.join(" "),
                notes: fields.notes.clone(),
                priority: fields.priority.unwrap_or_default(),
                due_date: due_date(fields, now)?,
                url: fields.url.clone(),
                ..NewReminder::default()
            };
            let reminder = service.add(list, draft)?;
            render(renderer, View::Reminder(&reminder), Some("Added: "))
        }
        Commands::Complete { list, item } => {
            let reminder = service.set_completed(list, item, true)?;
            render(renderer, View::Reminder(&reminder), Some("Completed: "))
        }
        Commands::Uncomplete { list, item } => {
            let reminder = service.set_completed(list, item, false)?;
            render(renderer, View::Reminder(&reminder), Some("Uncompleted: "))
        }
        Commands::Edit {
            list,
            item,
            text,
            fields,
            move_to,
        } => {
            let patch = ReminderPatch {
                title: (!text.is_empty()).then(|| text.join(" ")),
                notes: fields.notes.clone(),
                completed: None,
                priority: fields.priority,
                due_date: due_date(fields, now)?,
                url: fields.url.clone(),
            };
            let reminder = service.edit(list, item, &patch, move_to.as_deref())?;
            render(renderer, View::Reminder(&reminder), Some("Updated: "))
        }
        Commands::Delete { list, item } => match service.delete(list, item) {
            Ok(reminder) => render(renderer, View::Reminder(&reminder), Some("Deleted: ")),
            Err(e) if e.is_reminder_not_found() => {
                warn!("{e}");
                Ok(String::new())
            }
            Err(e) => Err(e),
        },
        Commands::NewList { name, source } => {
            let list = service.new_list(name, source.as_deref())?;
            render(renderer, View::List(&list), Some("Created list: "))
        }
        Commands::DeleteList { list } => {
            let list = service.delete_list(list)?;
            render(renderer, View::List(&list), Some("Deleted list: "))
        }
        Commands::EditList { list, name } => {
            let list = service.rename_list(list, name)?;
            render(renderer, View::List(&list), Some("Renamed list: "))
        }
    }
}

fn render(renderer: &Renderer, view: View<'_>, label: Option<&str>) -> Result<String> {
    Ok(renderer.render_labeled(view, label)?)
}

fn due_date(fields: &FieldArgs, now: NaiveDateTime) -> Result<Option<DueDate>> {
    let due = fields
        .due_date
        .as_deref()
        .map(|input| parse_due_date(input, now))
        .transpose()?;
    Ok(due)
}

fn item_filter(args: &FilterArgs, now: NaiveDateTime) -> Result<ItemFilter> {
    let due = args
        .due_date
        .as_deref()
        .map(|input| parse_due_date(input, now))
        .transpose()?
        .map(|due| DueFilter {
            date: due.date(),
            include_overdue: args.include_overdue,
        });

    Ok(ItemFilter {
        display: DisplayOptions::from_flags(args.only_completed, args.include_completed),
        due,
        sort: args.sort,
        order: args.sort_order,
    })
}
