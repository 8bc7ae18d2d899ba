//! Fixed, localized text of the generated workbook.

/// Rendered in the preconditions column when a scenario has none.
pub const PLACEHOLDER: &str = "—";

/// Priority marker for critical scenarios.
pub const MARKER_CRITICAL: &str = "🔥";
/// Priority marker for every other scenario.
pub const MARKER_NORMAL: &str = "📋";

#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    pub summary_sheet: &'static str,
    pub summary_title: &'static str,
    pub date: &'static str,
    pub tester: &'static str,
    pub bot_version: &'static str,
    pub device: &'static str,
    /// Section, Total, then one column per status.
    pub summary_headers: [&'static str; 6],
    pub total_row: &'static str,

    /// Prefix of a scenario sheet's title row (`SECTION 2: MARATHON`).
    pub section_title: &'static str,
    pub scenario_headers: [&'static str; 7],
    /// Allowed entries of the status column, in dropdown order.
    pub statuses: [&'static str; 4],

    pub bugs_sheet: &'static str,
    pub bugs_title: &'static str,
    pub bug_headers: [&'static str; 8],

    pub completed: &'static str,
}

impl Labels {
    /// Tab name of the scenario sheet for the section at 0-based `index`.
    pub fn section_sheet_name(&self, index: usize, name: &str) -> String {
        format!("{}. {name}", index + 1)
    }

    /// First row of a scenario sheet.
    pub fn section_heading(&self, index: usize, name: &str) -> String {
        format!("{} {}: {}", self.section_title, index + 1, name.to_uppercase())
    }
}

pub static EN: Labels = Labels {
    summary_sheet: "Summary",
    summary_title: "TESTING SUMMARY",
    date: "Date:",
    tester: "Tester:",
    bot_version: "Bot version:",
    device: "Device:",
    summary_headers: ["Section", "Total", "✅ OK", "⚠️ Note", "❌ Bug", "⏭️ Skip"],
    total_row: "TOTAL",
    section_title: "SECTION",
    scenario_headers: [
        "№",
        "Priority",
        "Name",
        "Preconditions",
        "Expected result",
        "Status",
        "Comment",
    ],
    statuses: ["✅ OK", "⚠️ Note", "❌ Bug", "⏭️ Skipped"],
    bugs_sheet: "Bugs",
    bugs_title: "BUG LIST",
    bug_headers: [
        "ID",
        "Severity",
        "Scenario",
        "Description",
        "Steps",
        "Expected",
        "Actual",
        "Status",
    ],
    completed: "✅ Spreadsheet created!",
};

pub static RU: Labels = Labels {
    summary_sheet: "Сводка",
    summary_title: "СВОДКА ТЕСТИРОВАНИЯ",
    date: "Дата:",
    tester: "Тестировщик:",
    bot_version: "Версия бота:",
    device: "Устройство:",
    summary_headers: ["Раздел", "Всего", "✅ OK", "⚠️ Замеч.", "❌ Баг", "⏭️ Пропуск"],
    total_row: "ИТОГО",
    section_title: "РАЗДЕЛ",
    scenario_headers: [
        "№",
        "Приор.",
        "Название",
        "Предусловия",
        "Ожидаемый результат",
        "Статус",
        "Комментарий",
    ],
    statuses: ["✅ OK", "⚠️ Замечание", "❌ Баг", "⏭️ Пропущен"],
    bugs_sheet: "Баги",
    bugs_title: "СПИСОК БАГОВ",
    bug_headers: [
        "ID",
        "Серьёзность",
        "Сценарий",
        "Описание",
        "Шаги",
        "Ожидалось",
        "Фактически",
        "Статус",
    ],
    completed: "✅ Таблица создана!",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_names_and_headings() {
        assert_eq!(EN.section_sheet_name(1, "Marathon"), "2. Marathon");
        assert_eq!(EN.section_heading(1, "Marathon"), "SECTION 2: MARATHON");
        assert_eq!(RU.section_heading(0, "Регистрация"), "РАЗДЕЛ 1: РЕГИСТРАЦИЯ");
    }

    #[test]
    fn fixed_sheet_names_are_legal() {
        for labels in [&EN, &RU] {
            qasheet_model::validate_sheet_name(labels.summary_sheet).unwrap();
            qasheet_model::validate_sheet_name(labels.bugs_sheet).unwrap();
        }
    }
}
