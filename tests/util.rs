//! Shared test utilities for integration tests
//!
//! Candidate builders, in-memory collaborators and catalog fixtures
//! used across multiple test files.
#![allow(dead_code)]

use anyhow::Result;
use assert_fs::prelude::*;
use learnrec::core::model::{
    Candidate, Category, InterestRecord, Level, Resource, ResourceStatus,
};
use learnrec::core::recommend::{CandidateQuery, CandidateSource, InterestSource};
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};

/// Build a level, panicking on out-of-range test input.
pub fn level(v: u8) -> Level
{
    Level::new(v).expect("level in 1..=5")
}

/// A candidate with a synthetic resource and category.
pub fn candidate(
    resource_id: i64,
    category_id: i64,
    interest: u8,
) -> Candidate
{
    Candidate {
        resource: Resource {
            id: resource_id,
            name: format!("resource {resource_id}"),
            description: String::new(),
            link: format!("https://learn.example/r/{resource_id}"),
            status: ResourceStatus::Available,
        },
        category: Category::new(category_id, format!("category {category_id}"), ""),
        difficulty_level: level(3),
        interest_level: level(interest),
        rating: None,
    }
}

/// `n` candidates for one category with resource ids `category_id * 100 + i`.
pub fn bucket(
    category_id: i64,
    interest: u8,
    n: i64,
) -> Vec<Candidate>
{
    (0..n)
        .map(|i| candidate(category_id * 100 + i, category_id, interest))
        .collect()
}

pub fn interest(
    category_id: i64,
    interest: u8,
) -> InterestRecord
{
    InterestRecord {
        user_id: "learner".into(),
        category_id,
        skill_level: level(3),
        interest_level: level(interest),
    }
}

/// Candidate source returning a fixed list and recording how it was called.
#[derive(Default)]
pub struct StubCandidates
{
    pub candidates: Vec<Candidate>,
    pub calls: Cell<usize>,
    pub last_filter: RefCell<Option<Vec<i64>>>,
}

impl StubCandidates
{
    pub fn new(candidates: Vec<Candidate>) -> Self
    {
        Self { candidates, ..Self::default() }
    }
}

impl CandidateSource for StubCandidates
{
    fn candidates(
        &self,
        query: &CandidateQuery<'_>,
    ) -> Result<Vec<Candidate>>
    {
        self.calls
            .set(self.calls.get() + 1);
        *self
            .last_filter
            .borrow_mut() = query
            .categories
            .map(|cs| cs.iter().map(|c| c.id).collect());
        Ok(self.candidates.clone())
    }
}

/// Interest source returning a fixed list of records.
#[derive(Default)]
pub struct StubInterests(pub Vec<InterestRecord>);

impl InterestSource for StubInterests
{
    fn interested_categories(
        &self,
        _user_id: &str,
    ) -> Result<Vec<InterestRecord>>
    {
        Ok(self.0.clone())
    }
}

/// Small catalog exercising every filter of the retrieval contract.
///
/// User `ada`: Rust (1) interest 5 skill 2, SQL (2) interest 3 skill 4,
/// Go (3) interest 2 skill 3 (too low to recommend).
pub fn sample_catalog() -> Value
{
    json!({
        "categories": [
            { "id": 1, "name": "Rust", "description": "Systems programming" },
            { "id": 2, "name": "SQL", "description": "Relational databases" },
            { "id": 3, "name": "Go", "description": "" }
        ],
        "resources": [
            { "id": 10, "name": "The Book", "link": "https://doc.rust-lang.org/book/",
              "categories": [{ "category_id": 1, "difficulty_level": 2 }] },
            { "id": 11, "name": "Rustlings", "link": "https://rustlings.example/",
              "categories": [{ "category_id": 1, "difficulty_level": 1 }] },
            { "id": 12, "name": "Nomicon", "link": "https://doc.rust-lang.org/nomicon/",
              "categories": [{ "category_id": 1, "difficulty_level": 5 }] },
            { "id": 13, "name": "Async Book", "link": "https://rust-lang.github.io/async-book/",
              "categories": [{ "category_id": 1, "difficulty_level": 3 }] },
            { "id": 14, "name": "Draft Course", "link": "https://learn.example/draft",
              "status": "Pending",
              "categories": [{ "category_id": 1, "difficulty_level": 2 }] },
            { "id": 20, "name": "Use The Index", "link": "https://use-the-index-luke.com/",
              "categories": [{ "category_id": 2, "difficulty_level": 4 }] },
            { "id": 21, "name": "SQL Joins", "link": "https://learn.example/joins",
              "categories": [
                  { "category_id": 2, "difficulty_level": 3 },
                  { "category_id": 1, "difficulty_level": 2 }
              ] },
            { "id": 30, "name": "Tour of Go", "link": "https://go.dev/tour/",
              "categories": [{ "category_id": 3, "difficulty_level": 3 }] }
        ],
        "interests": [
            { "user_id": "ada", "category_id": 1, "skill_level": 2, "interest_level": 5 },
            { "user_id": "ada", "category_id": 2, "skill_level": 4, "interest_level": 3 },
            { "user_id": "ada", "category_id": 3, "skill_level": 3, "interest_level": 2 },
            { "user_id": "bob", "category_id": 1, "skill_level": 2, "interest_level": 4 }
        ],
        "completions": [
            { "user_id": "ada", "resource_id": 11, "rating": "satisfied" },
            { "user_id": "bob", "resource_id": 10, "rating": "extremely_satisfied" },
            { "user_id": "bob", "resource_id": 13, "rating": "dissatisfied" },
            { "user_id": "bob", "resource_id": 21, "rating": null }
        ]
    })
}

/// Write `doc` as `catalog.json` into a fresh temp dir.
pub fn write_catalog(doc: &Value) -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("catalog.json")
        .write_str(&serde_json::to_string_pretty(doc).expect("json"))
        .expect("write catalog");

    tmp
}
