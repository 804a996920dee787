// src/store/catalog.rs
//
// Test catalog: loaded at startup, read-only afterwards.

use super::{Store, StoreError, StoreResult};
use crate::models::test::{Question, Test};

impl Store {
    /// Adds test definitions. Test ids must be unique across the catalog.
    pub fn load_catalog(&self, tests: Vec<Test>) -> StoreResult<()> {
        let mut inner = self.write();

        for (i, test) in tests.iter().enumerate() {
            let duplicate_in_batch = tests[..i].iter().any(|t| t.id == test.id);
            if duplicate_in_batch || inner.tests.contains_key(&test.id) {
                return Err(StoreError::Conflict(format!(
                    "test {} already exists",
                    test.id
                )));
            }
        }

        for test in tests {
            inner.tests.insert(test.id, test);
        }
        Ok(())
    }

    /// Full test definition including questions and expected answers.
    pub fn test_by_id(&self, test_id: u64) -> Option<Test> {
        self.read().tests.get(&test_id).cloned()
    }
}

fn question(id: u64, text: &str, answer: &str) -> Question {
    Question {
        id,
        name: format!("Question {id}"),
        text: text.to_string(),
        answer: answer.to_string(),
        max_score: 10,
    }
}

/// Built-in catalog used when no catalog file is configured.
pub fn seed_tests() -> Vec<Test> {
    vec![Test {
        id: 1,
        name: "test 1".to_string(),
        description: "description for test 1".to_string(),
        time_limit_secs: 60 * 60,
        max_score: 100,
        questions: vec![
            question(
                1,
                "Count the vowels in the national anthem of the Russian Federation, \
                 excluding the letter 'o', and answer with X (vowels) - Y (letters 'o') = Z.",
                "270",
            ),
            question(
                2,
                "Identify the source and the exact publication date and time of the news item: \
                 'From January to September, corporate bonds showed the highest ruble yield. \
                 But for September alone, another asset took first place.'",
                "РБК",
            ),
            question(
                3,
                "Compute beta = Cov(Ra, Rp) / Var(Ra) for non-renewable resources in Mongolia \
                 across 5 indicators using World Bank Group data for 2025.",
                "2334",
            ),
            question(
                4,
                "Restore the punctuation: научно-технический прогресс не социальный принесёт \
                 счастья если не будет дополняться чрезвычайно глубокими изменениями в социальной \
                 нравственной и культурной жизни человечества",
                "Научно-технический прогресс не социальный принесёт счастья, если не будет \
                 дополняться чрезвычайно глубокими изменениями в социальной, нравственной и \
                 культурной жизни человечества.",
            ),
            question(
                5,
                "Anna, Boris, Vasily and Galina are in a room.\n\
                 1. If Anna did not take the candy, Boris took it.\n\
                 2. If Vasily did not take the candy, Galina did not take it either.\n\
                 3. Exactly one person took the candy.",
                "анна взяла конфету",
            ),
            question(
                6,
                "A binary star has period T = 3 years and its components are two astronomical \
                 units apart. Express the star's mass in solar masses, rounded to 2 decimals.",
                "0,89",
            ),
            question(
                7,
                "What was the key rate of the Central Bank of Russia on 22.08.1995?",
                "180",
            ),
        ],
        num_of_questions: 4,
    }]
}
