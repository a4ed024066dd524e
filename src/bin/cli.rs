use chrono::Utc;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use weekplan::config::open_store_at;
use weekplan::{
    AppConfig, ClockTime, Day, DaySchedule, FlexibleTask, FlexibleTaskPatch, MandatoryTask,
    MandatoryTaskPatch, MasterSchedule, PersistenceError, Priority, SaveOutcome,
    ScheduleEditError, TaskDuration, TimeOfDay, describe_active_days, logging, save_if_changed,
    validate, week_view,
};

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the master schedule\n  day <day>                          Show the effective schedule for one day\n  week                               Summarise every day of the week\n  name <text...>                     Rename the schedule\n  hours <HH:MM> <HH:MM>              Set the daily start and end time\n  tz <zone>                          Set the IANA time zone\n  days <csv>                         Set active days (e.g. mon,wed,fri)\n  task add [summary...]              Append a flexible task with defaults\n  task set <n> <field> <value...>    Fields: summary, duration <h> <m>, weekends <true|false>,\n                                     time <morning|afternoon|evening|night|none>, freq <n>,\n                                     color <hex|none>, priority <low|medium|high|none>\n  task rm <n>                        Remove flexible task n\n  mand add [summary...]              Append a mandatory task with defaults\n  mand set <n> <field> <value...>    Fields: summary, start <HH:MM>, end <HH:MM>, from <day>,\n                                     to <day>, color <hex|none>, location <text|none>\n  mand rm <n>                        Remove mandatory task n\n  validate                           List validation problems\n  save <path>                        Validate and persist (skipped when unchanged)\n  load <path>                        Load a schedule from disk\n  quit|exit                          Exit"
    );
}

fn print_schedule(schedule: &MasterSchedule) {
    println!("Name       : {}", schedule.name);
    println!("Time zone  : {}", schedule.time_zone);
    println!("Hours      : {} - {}", schedule.start_time, schedule.end_time);
    println!("Active days: {}", describe_active_days(&schedule.active_days));
    println!("Tasks:");
    if schedule.tasks.is_empty() {
        println!("  (none)");
    }
    for (idx, task) in schedule.tasks.iter().enumerate() {
        println!(
            "  {}. {} [{}, {}x/week{}]",
            idx + 1,
            display_summary(&task.summary),
            task.duration,
            task.weekly_frequency,
            if task.include_on_weekends { ", weekends" } else { "" }
        );
    }
    println!("Mandatory tasks:");
    if schedule.mandatory_tasks.is_empty() {
        println!("  (none)");
    }
    for (idx, task) in schedule.mandatory_tasks.iter().enumerate() {
        println!(
            "  {}. {} [{}-{}, {} to {}]",
            idx + 1,
            display_summary(&task.summary),
            task.start_time,
            task.end_time,
            task.start_day,
            task.end_day
        );
    }
}

fn display_summary(summary: &str) -> &str {
    if summary.trim().is_empty() {
        "(untitled)"
    } else {
        summary
    }
}

fn format_clock(value: &str) -> String {
    ClockTime::parse(value)
        .map(ClockTime::format_12h)
        .unwrap_or_else(|_| value.to_string())
}

fn print_day(day: Day, day_schedule: Option<&DaySchedule>) {
    let Some(day_schedule) = day_schedule else {
        println!("No schedule for {day} (not an active day).");
        return;
    };
    let minutes = day_schedule.total_task_minutes();
    println!(
        "{} {} - {} | {} items | {}h {}m of tasks",
        day,
        format_clock(&day_schedule.start_time),
        format_clock(&day_schedule.end_time),
        day_schedule.item_count(),
        minutes / 60,
        minutes % 60
    );
    for item in day_schedule.items() {
        let marker = if item.is_mandatory() { "!" } else { "-" };
        println!("  {marker} {item}");
    }
}

fn print_violations(schedule: &MasterSchedule) -> bool {
    let violations = validate(schedule);
    if violations.is_empty() {
        println!("Schedule is valid.");
        return true;
    }
    println!("Schedule has {} problem(s):", violations.len());
    for violation in violations {
        println!("  - {violation}");
    }
    false
}

fn parse_index(raw: Option<&str>, len: usize) -> Option<usize> {
    let n: usize = raw?.parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn optional_text(raw: &str) -> Option<String> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(raw.to_string())
    }
}

fn flexible_patch(field: &str, args: &[&str]) -> Result<FlexibleTaskPatch, String> {
    let rest = args.join(" ");
    let mut patch = FlexibleTaskPatch::default();
    match field {
        "summary" => patch.summary = Some(rest),
        "duration" => {
            let hours = args.first().and_then(|v| v.parse().ok());
            let minutes = args.get(1).map_or(Some(0), |v| v.parse().ok());
            match (hours, minutes) {
                (Some(h), Some(m)) if m < 60 => patch.duration = Some(TaskDuration::new(h, m)),
                _ => return Err("Usage: task set <n> duration <hours> [minutes]".into()),
            }
        }
        "weekends" => {
            patch.include_on_weekends =
                Some(parse_bool(&rest).ok_or("Invalid bool (true|false)")?);
        }
        "time" => {
            patch.preferred_time = Some(match optional_text(&rest) {
                None => None,
                Some(value) => Some(TimeOfDay::from_str(&value)?),
            });
        }
        "freq" => {
            patch.weekly_frequency = Some(rest.parse().map_err(|_| "Invalid frequency")?);
        }
        "color" => patch.color = Some(optional_text(&rest)),
        "priority" => {
            patch.priority = Some(match optional_text(&rest) {
                None => None,
                Some(value) => Some(Priority::from_str(&value)?),
            });
        }
        other => return Err(format!("Unknown task field '{other}'")),
    }
    Ok(patch)
}

fn mandatory_patch(field: &str, args: &[&str]) -> Result<MandatoryTaskPatch, String> {
    let rest = args.join(" ");
    let mut patch = MandatoryTaskPatch::default();
    match field {
        "summary" => patch.summary = Some(rest),
        "start" => patch.start_time = Some(rest),
        "end" => patch.end_time = Some(rest),
        "from" => patch.start_day = Some(Day::from_str(&rest).map_err(|e| e.to_string())?),
        "to" => patch.end_day = Some(Day::from_str(&rest).map_err(|e| e.to_string())?),
        "color" => patch.color = Some(optional_text(&rest)),
        "location" => patch.location = Some(optional_text(&rest)),
        other => return Err(format!("Unknown mandatory task field '{other}'")),
    }
    Ok(patch)
}

fn apply_edit(
    schedule: &mut MasterSchedule,
    result: Result<MasterSchedule, ScheduleEditError>,
    done: &str,
) {
    match result {
        Ok(next) => {
            *schedule = next;
            println!("{done}");
        }
        Err(err) => {
            tracing::debug!(%err, "edit rejected");
            println!("Error: {err}");
        }
    }
}

/// Last snapshot written to or read from disk, with the path it lives at.
type SavedSnapshot = Option<(PathBuf, MasterSchedule)>;

fn save(schedule: &MasterSchedule, last_saved: &mut SavedSnapshot, path: &str) {
    let target = PathBuf::from(path);
    // a snapshot only counts as saved for the file that holds it
    let previous = last_saved
        .as_ref()
        .filter(|(saved_path, _)| *saved_path == target)
        .map(|(_, snapshot)| snapshot);
    let store = match open_store_at(Path::new(path)) {
        Ok(store) => store,
        Err(err) => {
            println!("Error opening {path}: {err}");
            return;
        }
    };
    match save_if_changed(store.as_ref(), previous, schedule, Utc::now()) {
        Ok(SaveOutcome::Unchanged) => println!("No changes to save."),
        Ok(SaveOutcome::Saved(stamped)) => {
            println!("Schedule saved to {path}.");
            *last_saved = Some((target, stamped));
        }
        Err(PersistenceError::InvalidSchedule(violations)) => {
            println!("Schedule not saved:");
            for violation in violations {
                println!("  - {violation}");
            }
        }
        Err(err) => println!("Error saving schedule: {err}"),
    }
}

fn main() {
    let config = AppConfig::from_env();
    logging::init_tracing(&config.log_filter);

    let mut schedule = MasterSchedule::new("My Schedule", Utc::now());
    let mut last_saved: SavedSnapshot = None;

    println!("Weekplan (CLI) - type 'help' for commands\n");
    print_schedule(&schedule);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts[0];
        let args = &parts[1..];

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_schedule(&schedule),
            "day" => match args.first().map(|raw| Day::from_str(raw)) {
                Some(Ok(day)) => print_day(day, schedule.day_schedule(day).as_ref()),
                Some(Err(err)) => println!("Error: {err}"),
                None => println!("Usage: day <day>"),
            },
            "week" => {
                for (day, day_schedule) in week_view(&schedule) {
                    match day_schedule {
                        Some(day_schedule) => {
                            let minutes = day_schedule.total_task_minutes();
                            println!(
                                "{:<10}: {} items ({}h {}m of tasks)",
                                day.label(),
                                day_schedule.item_count(),
                                minutes / 60,
                                minutes % 60
                            );
                        }
                        None => println!("{:<10}: not active", day.label()),
                    }
                }
            }
            "name" => {
                if args.is_empty() {
                    println!("Usage: name <text...>");
                    continue;
                }
                schedule = schedule.with_name(args.join(" "));
                println!("Schedule renamed.");
            }
            "hours" => match args {
                [start, end] => {
                    schedule = schedule.with_daily_window(*start, *end);
                    println!("Daily hours set.");
                }
                _ => println!("Usage: hours <HH:MM> <HH:MM>"),
            },
            "tz" => match args {
                [zone] => {
                    schedule = schedule.with_time_zone(*zone);
                    println!("Time zone set.");
                }
                _ => println!("Usage: tz <zone>"),
            },
            "days" => {
                let Some(csv) = args.first() else {
                    println!("Usage: days <csv>");
                    continue;
                };
                let parsed: Result<Vec<Day>, _> = csv
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(Day::from_str)
                    .collect();
                match parsed {
                    Ok(days) => {
                        schedule = schedule.with_active_days(days);
                        println!(
                            "Active days: {}",
                            describe_active_days(&schedule.active_days)
                        );
                    }
                    Err(err) => println!("Error: {err}"),
                }
            }
            "task" => match args {
                ["add", summary @ ..] => {
                    let task = FlexibleTask::new().with_summary(summary.join(" "));
                    schedule = schedule.with_task_added(task);
                    println!("Added task {}.", schedule.tasks.len());
                }
                ["set", n, field, values @ ..] => {
                    let Some(idx) = parse_index(Some(*n), schedule.tasks.len()) else {
                        println!("Task {n} not found.");
                        continue;
                    };
                    match flexible_patch(field, values) {
                        Ok(patch) => {
                            let id = schedule.tasks[idx].id;
                            let result = schedule.clone().with_task_updated(id, &patch);
                            apply_edit(&mut schedule, result, &format!("Task {n} updated."));
                        }
                        Err(err) => println!("Error: {err}"),
                    }
                }
                ["rm", n] => match parse_index(Some(*n), schedule.tasks.len()) {
                    Some(idx) => {
                        let id = schedule.tasks[idx].id;
                        let result = schedule.clone().with_task_removed(id);
                        apply_edit(&mut schedule, result, &format!("Removed task {n}."));
                    }
                    None => println!("Task {n} not found."),
                },
                _ => println!("Usage: task add [summary...] | task set <n> <field> <value...> | task rm <n>"),
            },
            "mand" => match args {
                ["add", summary @ ..] => {
                    let task = MandatoryTask::new().with_summary(summary.join(" "));
                    schedule = schedule.with_mandatory_task_added(task);
                    println!("Added mandatory task {}.", schedule.mandatory_tasks.len());
                }
                ["set", n, field, values @ ..] => {
                    let Some(idx) = parse_index(Some(*n), schedule.mandatory_tasks.len()) else {
                        println!("Mandatory task {n} not found.");
                        continue;
                    };
                    match mandatory_patch(field, values) {
                        Ok(patch) => {
                            let id = schedule.mandatory_tasks[idx].id;
                            let result = schedule.clone().with_mandatory_task_updated(id, &patch);
                            apply_edit(
                                &mut schedule,
                                result,
                                &format!("Mandatory task {n} updated."),
                            );
                        }
                        Err(err) => println!("Error: {err}"),
                    }
                }
                ["rm", n] => match parse_index(Some(*n), schedule.mandatory_tasks.len()) {
                    Some(idx) => {
                        let id = schedule.mandatory_tasks[idx].id;
                        let result = schedule.clone().with_mandatory_task_removed(id);
                        apply_edit(
                            &mut schedule,
                            result,
                            &format!("Removed mandatory task {n}."),
                        );
                    }
                    None => println!("Mandatory task {n} not found."),
                },
                _ => println!("Usage: mand add [summary...] | mand set <n> <field> <value...> | mand rm <n>"),
            },
            "validate" => {
                print_violations(&schedule);
            }
            "save" => match args {
                [path] => save(&schedule, &mut last_saved, path),
                _ => println!("Usage: save <path>"),
            },
            "load" => match args {
                [path] => match open_store_at(Path::new(path)).and_then(|store| store.load_schedule()) {
                    Ok(Some(loaded)) => {
                        schedule = loaded.clone();
                        last_saved = Some((PathBuf::from(path), loaded));
                        println!("Schedule loaded from {path}.");
                    }
                    Ok(None) => println!("No schedule stored at {path}."),
                    Err(err) => println!("Error loading schedule: {err}"),
                },
                _ => println!("Usage: load <path>"),
            },
            other => println!("Unknown command '{other}'. Type 'help' for commands."),
        }
    }
}
