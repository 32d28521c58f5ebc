use crate::models::{NewActor, NewMovie, NewUser};
use crate::AppState;

pub const SEED_USERNAME: &str = "tomato";
pub const SEED_PASSWORD: &str = "password123";

pub fn movies() -> Vec<NewMovie> {
    vec![
        NewMovie {
            title: "Spider-Man: No Way Home".into(),
            genre: "Action".into(),
            length: 148,
            year: 2021,
        },
        NewMovie {
            title: "Dune".into(),
            genre: "Sci-fi".into(),
            length: 155,
            year: 2021,
        },
    ]
}

pub fn actors() -> Vec<NewActor> {
    let actor = |first: &str, last: &str, gender: &str, country: &str| NewActor {
        first_name: first.into(),
        last_name: last.into(),
        gender: gender.into(),
        country: country.into(),
    };
    vec![
        actor("Tom", "Holland", "male", "UK"),
        actor("Marisa", "Tomei", "female", "USA"),
        actor("Timothee", "Chalemet", "male", "USA"),
        actor("Zendaya", "", "female", "USA"),
    ]
}

/// Inserts the `tomato` account and the fixture catalog.
///
/// The account is claimed before any catalog row is written, so seeding an
/// already seeded store fails without duplicating movies or actors.
pub async fn seed(state: &AppState) -> anyhow::Result<()> {
    if state.users.find_by_username(SEED_USERNAME).await?.is_some() {
        anyhow::bail!("seed user {SEED_USERNAME} already exists");
    }
    let password_hash = state.hasher.hash_blocking(SEED_PASSWORD.to_string()).await?;
    state
        .users
        .insert(NewUser {
            username: SEED_USERNAME.to_string(),
            password_hash,
        })
        .await?;

    for movie in movies() {
        state.movies.insert(movie).await?;
    }
    for actor in actors() {
        state.actors.insert(actor).await?;
    }
    tracing::debug!("seeded fixture catalog");
    Ok(())
}
