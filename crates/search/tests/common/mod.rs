//! Shared fixtures for engine integration tests.
//!
//! Seeds a small two-church dataset into every available repository so
//! each scenario can run against all backends.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};

use civica_search::backends::MemoryRepository;
use civica_search::core::Repository;
use civica_search::{Audience, EngineConfig, ScopeId, SearchEngine};

/// 1990-01-01T00:00:00Z
pub const JAN_1990: i64 = 631_152_000_000;
/// 2000-01-01T00:00:00Z
pub const JAN_2000: i64 = 946_684_800_000;
/// 2000-07-01T00:00:00Z
pub const JUL_2000: i64 = 962_409_600_000;
/// 2001-01-01T00:00:00Z
pub const JAN_2001: i64 = 978_307_200_000;
/// 2010-01-01T00:00:00Z
pub const JAN_2010: i64 = 1_262_304_000_000;

/// The seeded dataset, by collection.
pub fn dataset() -> Vec<(&'static str, Vec<Value>)> {
    vec![
        (
            "churches",
            vec![
                json!({
                    "id": "c1", "name": "Iglesia Central", "country": "Perú",
                    "department": "Lima", "province": "Lima", "district": "Miraflores",
                    "address": "Av. Larco 123", "foundingDate": JAN_1990,
                    "isActive": true, "isAnchor": true
                }),
                json!({
                    "id": "c2", "name": "Iglesia Bethel", "country": "Perú",
                    "department": "Cusco", "province": "Cusco", "district": "Wánchaq",
                    "address": "Calle Sol 9", "foundingDate": JAN_2000,
                    "isActive": true, "isAnchor": false
                }),
                json!({
                    "id": "c3", "name": "Misión Ayacucho", "country": "Perú",
                    "department": "Ayacucho", "province": "Huamanga", "district": "Ayacucho",
                    "address": "Jr. Lima 1", "foundingDate": JAN_2010,
                    "isActive": false, "isAnchor": false
                }),
            ],
        ),
        (
            "people",
            vec![
                person("p1", "María José", "López Díaz", JUL_2000, "F", "S", "Perú"),
                person("p2", "José Luis", "Pérez Ramos", JAN_1990, "M", "M", "Bolivia"),
                person("p3", "Ana", "López Torres", JAN_2001, "F", "M", "Perú"),
                person("p4", "Carmen Rosa", "Quispe", JAN_2000, "F", "W", "Perú"),
                person("p5", "Juan", "Díaz", 955_000_000_000, "M", "S", "Perú"),
                person("p6", "Lucía", "Mamani", 965_000_000_000, "F", "S", "Perú"),
                person("p7", "Pedro", "Vargas", JAN_1990, "M", "M", "Perú"),
            ],
        ),
        (
            "members",
            vec![
                member("m1", "p1", "c1", true, 1000),
                member("m2", "p2", "c1", true, 2000),
                member("m3", "p3", "c1", true, 3000),
                member("m4", "p4", "c1", true, 4000),
                member("m5", "p5", "c2", true, 5000),
                member("m6", "p6", "c1", false, 6000),
            ],
        ),
        (
            "tithes",
            vec![
                tithe("t1", "m1", "c1", 1_709_251_200_000, json!(100), true),
                tithe("t2", "m2", "c1", 1_711_929_600_000, json!(250.5), true),
                tithe("t3", "m1", "c1", 1_712_016_000_000, json!(50), true),
                tithe("t4", "m5", "c2", 1_709_337_600_000, json!(300), true),
                tithe("t5", "m3", "c1", 1_709_424_000_000, json!(75), false),
            ],
        ),
        (
            "users",
            vec![
                json!({
                    "id": "u1", "personId": "p7", "churchId": "c1", "email": "pedro@civica.pe",
                    "roles": ["admin", "pastor"], "passwordHash": "$argon2$x",
                    "isActive": true, "createdAt": 1
                }),
                json!({
                    "id": "u2", "personId": "p1", "churchId": "c1", "email": "maria@civica.pe",
                    "roles": "secretary", "passwordHash": "$argon2$y",
                    "isActive": true, "createdAt": 2
                }),
            ],
        ),
        (
            "ministries",
            vec![
                json!({
                    "id": "min1", "name": "Alabanza y Adoración", "category": "worship",
                    "churchId": "c1", "foundingDate": JAN_2000, "isActive": true, "createdAt": 1
                }),
                json!({
                    "id": "min2", "name": "Jóvenes Unidos", "category": "youth",
                    "churchId": "c1", "foundingDate": JAN_2001, "isActive": true, "createdAt": 2
                }),
            ],
        ),
        (
            "ministry_members",
            vec![
                json!({"id": "mm1", "memberId": "m1", "ministryId": "min1", "churchId": "c1", "isActive": true, "createdAt": 1}),
                json!({"id": "mm2", "memberId": "m2", "ministryId": "min2", "churchId": "c1", "isActive": true, "createdAt": 2}),
                json!({"id": "mm3", "memberId": "m3", "ministryId": "min1", "churchId": "c1", "isActive": true, "createdAt": 3}),
            ],
        ),
    ]
}

fn person(
    id: &str,
    first: &str,
    last: &str,
    birth: i64,
    gender: &str,
    marital: &str,
    country: &str,
) -> Value {
    json!({
        "id": id, "firstNames": first, "lastNames": last, "birthDate": birth,
        "gender": gender, "maritalStatus": marital, "country": country,
        "address": format!("Jr. Unión {}", id)
    })
}

fn member(id: &str, person: &str, church: &str, active: bool, created: i64) -> Value {
    json!({"id": id, "personId": person, "churchId": church, "isActive": active, "createdAt": created})
}

fn tithe(id: &str, member: &str, church: &str, date: i64, amount: Value, active: bool) -> Value {
    json!({
        "id": id, "memberId": member, "churchId": church, "date": date,
        "amount": amount, "isActive": active
    })
}

/// Creates a memory repository holding the dataset.
pub fn memory_repository() -> MemoryRepository {
    let repo = MemoryRepository::new();
    for (collection, records) in dataset() {
        repo.insert_many(collection, records)
            .expect("Failed to seed memory repository");
    }
    repo
}

/// Creates an in-memory SQLite repository holding the dataset.
#[cfg(feature = "sqlite")]
pub fn sqlite_repository() -> civica_search::backends::sqlite::SqliteRepository {
    let repo = civica_search::backends::sqlite::SqliteRepository::in_memory()
        .expect("Failed to create SQLite repository");
    repo.init_schema().expect("Failed to initialize schema");
    for (collection, records) in dataset() {
        repo.insert_many(collection, records)
            .expect("Failed to seed SQLite repository");
    }
    repo
}

/// Every available repository, each seeded with the dataset.
pub fn repositories() -> Vec<Arc<dyn Repository>> {
    let mut repos: Vec<Arc<dyn Repository>> = vec![Arc::new(memory_repository())];
    #[cfg(feature = "sqlite")]
    repos.push(Arc::new(sqlite_repository()));
    repos
}

/// Every available engine with the default configuration.
pub fn engines() -> Vec<SearchEngine<dyn Repository>> {
    repositories()
        .into_iter()
        .map(|repo| SearchEngine::new(repo, EngineConfig::default()))
        .collect()
}

/// An audience bound to one church.
pub fn church(id: &str) -> Audience {
    Audience::scoped(ScopeId::new(id))
}
