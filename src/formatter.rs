use crate::{
    config::{COL_BREAKFAST, COL_CALORIES, COL_DINNER, COL_LUNCH, COL_SUPPORT, COL_TRAINING},
    source::PlanRow,
};

/// The plan columns that become tasks, in the order the tasks are created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    Breakfast,
    Lunch,
    Dinner,
    Support,
    Training,
    CalorieGap,
}

impl PlanField {
    pub const ALL: [PlanField; 6] = [
        PlanField::Breakfast,
        PlanField::Lunch,
        PlanField::Dinner,
        PlanField::Support,
        PlanField::Training,
        PlanField::CalorieGap,
    ];

    pub fn column(self) -> &'static str {
        match self {
            PlanField::Breakfast => COL_BREAKFAST,
            PlanField::Lunch => COL_LUNCH,
            PlanField::Dinner => COL_DINNER,
            PlanField::Support => COL_SUPPORT,
            PlanField::Training => COL_TRAINING,
            PlanField::CalorieGap => COL_CALORIES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlanField::Breakfast => "🥣 早餐",
            PlanField::Lunch => "🍱 午餐",
            PlanField::Dinner => "🍽️ 晚餐",
            PlanField::Support => "💊 补给",
            PlanField::Training => "💪 训练",
            PlanField::CalorieGap => "🔥 热量缺口",
        }
    }
}

/// Build one task text per filled plan field of `row`.
///
/// Columns that are missing or only hold whitespace are skipped. An empty result means the
/// day exists in the sheet but nothing was planned.
pub fn format_tasks(row: &PlanRow) -> Vec<String> {
    PlanField::ALL
        .iter()
        .filter_map(|field| {
            let value = row.get(field.column())?.trim();
            if value.is_empty() {
                log::trace!("Column {} is empty", field.column());
                None
            } else {
                Some(format!("{}: {value}", field.label()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> PlanRow {
        cells.iter().copied().collect()
    }

    #[test]
    fn only_filled_fields_in_fixed_order() {
        let tasks = format_tasks(&row(&[
            ("DATE", "1月5日"),
            ("KAL_GAP", "500"),
            ("TRAINING", "5km run"),
            ("BREAKFAST", ""),
            ("LUNCH", "  "),
        ]));
        assert_eq!(tasks, vec!["💪 训练: 5km run", "🔥 热量缺口: 500"]);
    }

    #[test]
    fn all_six_fields_have_their_label() {
        let tasks = format_tasks(&row(&[
            ("BREAKFAST", "oats"),
            ("LUNCH", "rice"),
            ("DINNER", "fish"),
            ("SUPPORT", "vitamin D"),
            ("TRAINING", "squats"),
            ("KAL_GAP", "300"),
        ]));
        assert_eq!(tasks.len(), 6);
        for (task, field) in tasks.iter().zip(PlanField::ALL) {
            assert!(task.starts_with(&format!("{}: ", field.label())), "{task}");
        }
        assert_eq!(tasks[3], "💊 补给: vitamin D");
    }

    #[test]
    fn blank_row_produces_nothing() {
        assert!(format_tasks(&row(&[("DATE", "1月5日"), ("DINNER", "")])).is_empty());
        assert!(format_tasks(&PlanRow::default()).is_empty());
    }

    #[test]
    fn labels_are_distinct() {
        for (i, a) in PlanField::ALL.iter().enumerate() {
            for b in &PlanField::ALL[i + 1..] {
                assert_ne!(a.label(), b.label());
            }
        }
    }
}
