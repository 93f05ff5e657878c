//! Workout set tracker

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ConfigError};

/// Most sets a single exercise can track
pub const MAX_SETS: u32 = 20;

/// Exercises × sets grid of completed sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutBoard {
    exercises: Vec<String>,
    sets: u32,
    done: Vec<Vec<bool>>,
}

impl WorkoutBoard {
    pub fn new(exercises: Vec<String>, sets: u32) -> Result<Self, ConfigError> {
        let exercises = Self::validate(exercises, sets)?;
        let done = vec![vec![false; sets as usize]; exercises.len()];
        Ok(Self {
            exercises,
            sets,
            done,
        })
    }

    /// Replace exercises and set count, clearing every completed set
    pub fn reconfigure(&mut self, exercises: Vec<String>, sets: u32) -> Result<(), ConfigError> {
        *self = Self::new(exercises, sets)?;
        Ok(())
    }

    /// Flip one set and return its new state
    pub fn toggle(&mut self, exercise: usize, set: usize) -> Result<bool, AppError> {
        let cell = self
            .done
            .get_mut(exercise)
            .and_then(|row| row.get_mut(set))
            .ok_or(AppError::UnknownSet { exercise, set })?;
        *cell = !*cell;
        Ok(*cell)
    }

    pub fn exercises(&self) -> &[String] {
        &self.exercises
    }

    pub fn sets(&self) -> u32 {
        self.sets
    }

    pub fn is_done(&self, exercise: usize, set: usize) -> bool {
        self.done
            .get(exercise)
            .and_then(|row| row.get(set))
            .copied()
            .unwrap_or(false)
    }

    pub fn completed_sets(&self) -> usize {
        self.done.iter().flatten().filter(|&&done| done).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[bool])> {
        self.exercises
            .iter()
            .map(String::as_str)
            .zip(self.done.iter().map(Vec::as_slice))
    }

    fn validate(exercises: Vec<String>, sets: u32) -> Result<Vec<String>, ConfigError> {
        if exercises.is_empty() {
            return Err(ConfigError::NoExercises);
        }
        if !(1..=MAX_SETS).contains(&sets) {
            return Err(ConfigError::InvalidSets { sets, max: MAX_SETS });
        }
        let exercises: Vec<String> = exercises
            .into_iter()
            .map(|name| name.trim().to_string())
            .collect();
        if exercises.iter().any(String::is_empty) {
            return Err(ConfigError::BlankExercise);
        }
        Ok(exercises)
    }
}

impl Default for WorkoutBoard {
    fn default() -> Self {
        Self {
            exercises: vec!["Pull".to_string(), "Push".to_string(), "Leg".to_string()],
            sets: 3,
            done: vec![vec![false; 3]; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_sets() {
        let mut board = WorkoutBoard::default();
        assert_eq!(board.toggle(1, 2).unwrap(), true);
        assert!(board.is_done(1, 2));
        assert_eq!(board.completed_sets(), 1);

        assert_eq!(board.toggle(1, 2).unwrap(), false);
        assert_eq!(board.completed_sets(), 0);
    }

    #[test]
    fn rejects_unknown_sets() {
        let mut board = WorkoutBoard::default();
        assert!(matches!(
            board.toggle(3, 0),
            Err(AppError::UnknownSet { exercise: 3, set: 0 })
        ));
        assert!(board.toggle(0, 3).is_err());
    }

    #[test]
    fn reconfigure_clears_progress() {
        let mut board = WorkoutBoard::default();
        board.toggle(0, 0).unwrap();

        board
            .reconfigure(vec![" Squat ".to_string(), "Row".to_string()], 5)
            .unwrap();
        assert_eq!(board.exercises(), ["Squat", "Row"]);
        assert_eq!(board.sets(), 5);
        assert_eq!(board.completed_sets(), 0);
    }

    #[test]
    fn invalid_reconfigure_keeps_board() {
        let mut board = WorkoutBoard::default();
        board.toggle(0, 0).unwrap();

        assert_eq!(board.reconfigure(Vec::new(), 3), Err(ConfigError::NoExercises));
        assert_eq!(
            board.reconfigure(vec!["Pull".to_string()], 0),
            Err(ConfigError::InvalidSets { sets: 0, max: MAX_SETS })
        );
        assert_eq!(
            board.reconfigure(vec!["  ".to_string()], 3),
            Err(ConfigError::BlankExercise)
        );
        assert_eq!(board.completed_sets(), 1);
    }
}
