//! Relative date labels in Brazilian Portuguese.
//!
//! Labels follow the calendar-day distance between `date` and `base`:
//!
//! | distance (days) | label |
//! |---|---|
//! | < -6 | `dd/MM/yyyy` |
//! | -6 ..= -2 | `último|última <weekday> às HH:mm` |
//! | -1 | `ontem às HH:mm` |
//! | 0 | `hoje às HH:mm` |
//! | 1 | `amanhã às HH:mm` |
//! | 2 ..= 6 | `<weekday> às HH:mm` |
//! | > 6 | `dd/MM/yyyy` |

use chrono::{Datelike, NaiveDateTime, Weekday};

/// Formats `date` relative to `base`, both in the same local time zone.
pub fn format_relative_pt_br(date: NaiveDateTime, base: NaiveDateTime) -> String {
    let distance = (date.date() - base.date()).num_days();
    let time = date.format("%H:%M");
    let weekday = date.weekday();

    match distance {
        d if d < -6 => date.format("%d/%m/%Y").to_string(),
        d if d < -1 => format!(
            "{} {} às {time}",
            last_article(weekday),
            weekday_name(weekday)
        ),
        -1 => format!("ontem às {time}"),
        0 => format!("hoje às {time}"),
        1 => format!("amanhã às {time}"),
        d if d < 7 => format!("{} às {time}", weekday_name(weekday)),
        _ => date.format("%d/%m/%Y").to_string(),
    }
}

// Sábado and domingo are masculine in Portuguese.
fn last_article(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sat | Weekday::Sun => "último",
        _ => "última",
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "domingo",
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
    }
}
