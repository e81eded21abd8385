//! Command layer: resolves queries against a fresh store snapshot, applies
//! the requested change and persists it.
//!
//! Every operation resolves all of its targets before writing anything, so
//! a query that matches nothing never touches the store. Store failures are
//! returned unchanged.

use std::slice;

use tracing::{debug, info};

use crate::core::{
    DisplayOptions, ItemFilter, NewReminder, Reminder, ReminderList, ReminderPatch, Source,
    resolve, resolve_by_key,
};
use crate::error::{CommandError, Result};
use crate::storage::ReminderStore;

/// Reminder operations over an injected [`ReminderStore`].
pub struct ReminderService<S> {
    store: S,
}

impl<S: ReminderStore> ReminderService<S> {
    /// Wraps `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// All writable lists.
    pub fn show_lists(&self) -> Result<Vec<ReminderList>> {
        self.store.lists()
    }

    /// Creates a list named `title`.
    ///
    /// With `source` given, it must equal the title of an existing source.
    /// Without it, the store must have exactly one distinct source title.
    pub fn new_list(&mut self, title: &str, source: Option<&str>) -> Result<ReminderList> {
        let sources = self.store.sources()?;
        let source = choose_source(&sources, source)?;
        let list = self.store.create_list(source, title)?;
        info!(id = %list.id, title, source = %source.title, "created list");
        Ok(list)
    }

    /// Renames the list matching `query`.
    pub fn rename_list(&mut self, query: &str, title: &str) -> Result<ReminderList> {
        let mut list = self.find_list(query)?;
        title.clone_into(&mut list.title);
        self.store.update_list(&list)?;
        info!(id = %list.id, title, "renamed list");
        Ok(list)
    }

    /// Deletes the list matching `query`, returning it.
    pub fn delete_list(&mut self, query: &str) -> Result<ReminderList> {
        let list = self.find_list(query)?;
        self.store.delete_list(&list)?;
        info!(id = %list.id, "deleted list");
        Ok(list)
    }

    /// The list matching `list_query` and its reminders after `filter`.
    pub fn show(
        &self,
        list_query: &str,
        filter: &ItemFilter,
    ) -> Result<(ReminderList, Vec<Reminder>)> {
        let list = self.find_list(list_query)?;
        let reminders = self.store.reminders(slice::from_ref(&list))?;
        let reminders = filter.apply(reminders);
        debug!(list = %list.title, count = reminders.len(), "listed reminders");
        Ok((list, reminders))
    }

    /// Reminders on every writable list after `filter`.
    pub fn show_all(&self, filter: &ItemFilter) -> Result<Vec<Reminder>> {
        let lists = self.store.lists()?;
        let reminders = filter.apply(self.store.reminders(&lists)?);
        debug!(lists = lists.len(), count = reminders.len(), "listed all reminders");
        Ok(reminders)
    }

    /// Adds a reminder to the list matching `list_query`.
    ///
    /// `draft.list_id` and `draft.alarm` are filled in here; a timed due date
    /// gets an alarm at the due time.
    pub fn add(&mut self, list_query: &str, mut draft: NewReminder) -> Result<Reminder> {
        require_title(&draft.title)?;
        let list = self.find_list(list_query)?;
        draft.list_id.clone_from(&list.id);
        draft.alarm = draft.due_date.as_ref().and_then(|due| due.alarm());

        let reminder = self.store.create_reminder(&draft)?;
        info!(id = %reminder.id, list = %list.title, "added reminder");
        Ok(reminder)
    }

    /// Applies `patch` to the reminder matching `item_query`, optionally
    /// moving it to the list matching `move_to`.
    ///
    /// Fields not set in the patch keep their current values.
    pub fn edit(
        &mut self,
        list_query: &str,
        item_query: &str,
        patch: &ReminderPatch,
        move_to: Option<&str>,
    ) -> Result<Reminder> {
        if patch.is_empty() && move_to.is_none() {
            return Err(CommandError::InvalidArgument("nothing to edit".to_string()).into());
        }
        if let Some(title) = &patch.title {
            require_title(title)?;
        }

        let list = self.find_list(list_query)?;
        let mut reminder = self.find_reminder(&list, item_query)?;
        let destination = move_to.map(|q| self.find_list(q)).transpose()?;

        patch.apply(&mut reminder);
        if let Some(destination) = &destination {
            reminder.move_to(destination);
        }
        self.store.update_reminder(&reminder)?;
        info!(id = %reminder.id, "edited reminder");
        Ok(reminder)
    }

    /// Sets the completion flag of the reminder matching `item_query`.
    pub fn set_completed(
        &mut self,
        list_query: &str,
        item_query: &str,
        completed: bool,
    ) -> Result<Reminder> {
        let list = self.find_list(list_query)?;
        let mut reminder = self.find_reminder(&list, item_query)?;

        ReminderPatch::completion(completed).apply(&mut reminder);
        self.store.update_reminder(&reminder)?;
        info!(id = %reminder.id, completed, "set completion");
        Ok(reminder)
    }

    /// Deletes the reminder matching `item_query`, returning it.
    ///
    /// A reminder that cannot be found is reported as
    /// [`CommandError::ReminderNotFound`], which callers may treat as
    /// non-fatal (see [`Error::is_reminder_not_found`](crate::error::Error::is_reminder_not_found)).
    pub fn delete(&mut self, list_query: &str, item_query: &str) -> Result<Reminder> {
        let list = self.find_list(list_query)?;
        let reminder = self.find_reminder(&list, item_query)?;
        self.store.delete_reminder(&reminder)?;
        info!(id = %reminder.id, "deleted reminder");
        Ok(reminder)
    }

    /// Resolves `query` against all writable lists.
    fn find_list(&self, query: &str) -> Result<ReminderList> {
        let lists = self.store.lists()?;
        let list = resolve(&lists, query).cloned().ok_or_else(|| CommandError::ListNotFound {
            query: query.to_string(),
        })?;
        debug!(query, id = %list.id, "resolved list");
        Ok(list)
    }

    /// Resolves `query` among the reminders of `list`.
    ///
    /// Positions count incomplete reminders only, even when un-completing.
    /// A completed reminder can still be selected by identifier or title.
    fn find_reminder(&self, list: &ReminderList, query: &str) -> Result<Reminder> {
        let all = self.store.reminders(slice::from_ref(list))?;
        let candidates = ItemFilter::display(DisplayOptions::Incomplete).apply(all.clone());

        let found = resolve(&candidates, query).or_else(|| resolve_by_key(&all, query));
        let reminder = found.cloned().ok_or_else(|| CommandError::ReminderNotFound {
            query: query.to_string(),
            list: list.title.clone(),
        })?;
        debug!(query, id = %reminder.id, "resolved reminder");
        Ok(reminder)
    }
}

fn require_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(CommandError::InvalidArgument("reminder title is empty".to_string()).into());
    }
    Ok(())
}

fn choose_source<'a>(sources: &'a [Source], requested: Option<&str>) -> Result<&'a Source> {
    if let Some(name) = requested {
        return sources
            .iter()
            .find(|s| s.title == name)
            .ok_or_else(|| {
                CommandError::ListSource(format!(
                    "no source named '{name}' (available: {})",
                    source_titles(sources).join(", ")
                ))
                .into()
            });
    }

    let titles = source_titles(sources);
    if titles.len() > 1 {
        return Err(CommandError::ListSource(format!(
            "multiple sources available, choose one with --source: {}",
            titles.join(", ")
        ))
        .into());
    }
    sources
        .first()
        .ok_or_else(|| CommandError::ListSource("no sources available".to_string()).into())
}

/// Distinct source titles in store order.
fn source_titles(sources: &[Source]) -> Vec<&str> {
    let mut titles: Vec<&str> = Vec::new();
    for source in sources {
        if !titles.contains(&source.title.as_str()) {
            titles.push(&source.title);
        }
    }
    titles
}
