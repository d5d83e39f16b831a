// Integration tests for PawMatch

use std::fs;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use paw_match::config::MatchingSettings;
use paw_match::core::{DecisionOutcome, EngineError, LikedPet, RecommendationSession, Recommender, SessionState};
use paw_match::models::{
    ActivityLevel, AddPetRequest, AdopterProfile, Decision, Gender, PetRecord, PreferredGender,
    RegisterAdopterRequest, RegisterShelterRequest, ShelterProfile,
};
use paw_match::routes::{self, AppState};
use paw_match::services::{
    accounts, AdopterStore, AdoptionStore, CsvStore, InMemoryStore, MediaResolver, PetCatalog,
    SessionCache, ShelterStore, StoreError,
};

fn shelter_request(name: &str, username: &str) -> RegisterShelterRequest {
    RegisterShelterRequest {
        name: name.to_string(),
        address: "1 Canal St".to_string(),
        email: "hello@paws.example".to_string(),
        phone: "+31 20 123 4567".to_string(),
        username: username.to_string(),
        password: "pw".to_string(),
    }
}

fn adopter_request() -> RegisterAdopterRequest {
    RegisterAdopterRequest {
        name: "Ada".to_string(),
        country: "NL".to_string(),
        age: 30,
        username: "Ada".to_string(),
        password: "secret".to_string(),
        pref_species: "Dog".to_string(),
        pref_gender: PreferredGender::Any,
        activity_level: ActivityLevel::High,
        allergy_friendly: false,
        has_house: true,
        has_garden: false,
        apartment_size: None,
    }
}

fn pet_request(name: &str, species: &str, activity_level: ActivityLevel) -> AddPetRequest {
    AddPetRequest {
        name: name.to_string(),
        species: species.to_string(),
        breed: "Mixed".to_string(),
        gender: Gender::Female,
        age: 3.0,
        activity_level,
        allergy_friendly: false,
        time_in_shelter: "< 1 year".to_string(),
        disability_current: String::new(),
        disability_past: String::new(),
        special_needs: String::new(),
        image_path: None,
    }
}

/// Run the whole browse-and-decide loop against a store
fn run_adoption_flow<S: AdoptionStore>(store: &S) {
    let recommender = Recommender::with_default_weights();
    let shelter = accounts::register_shelter(store, shelter_request("North Paws", "north")).unwrap();
    let bella = accounts::add_pet(store, &shelter.shelter_id, pet_request("Bella", "Dog", ActivityLevel::Medium)).unwrap();
    let tom = accounts::add_pet(store, &shelter.shelter_id, pet_request("Tom", "Cat", ActivityLevel::Low)).unwrap();
    let rex = accounts::add_pet(store, &shelter.shelter_id, pet_request("Rex", "Dog", ActivityLevel::High)).unwrap();
    let mut adopter = accounts::register_adopter(store, adopter_request()).unwrap();

    let (ranked, mut session) = recommender
        .start_session(&adopter, store.list_pets().unwrap(), None)
        .unwrap();
    let ids: Vec<_> = ranked.iter().map(|r| r.pet.pet_id.clone()).collect();

    // Bella and Rex tie at 0.8 and keep listing order
    assert_eq!(ids, vec![bella.pet_id.clone(), rex.pet_id.clone(), tom.pet_id.clone()]);
    assert!((ranked[0].match_score - 0.8).abs() < 1e-9);
    assert_eq!(session.current(), Some(bella.pet_id.as_str()));

    let outcome = recommender
        .decide(&mut adopter, &mut session, &bella.pet_id, Decision::Like, store)
        .unwrap();
    match outcome {
        DecisionOutcome::Contact(contact) => {
            assert_eq!(contact.phone, "+312 01234567");
            assert_eq!(contact.shelter_name, "North Paws");
        }
        other => panic!("expected contact, got {:?}", other),
    }

    recommender
        .decide(&mut adopter, &mut session, &rex.pet_id, Decision::Skip, store)
        .unwrap();
    assert_eq!(session.current(), Some(tom.pet_id.as_str()));

    // A fresh pass only offers what is left
    let stored = store.adopter(&adopter.adopter_id).unwrap().unwrap();
    let ranked = recommender.recommend(&stored, store.list_pets().unwrap(), None).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].pet.pet_id, tom.pet_id);

    let liked = recommender.liked_pets(&stored, store).unwrap();
    assert_eq!(liked.len(), 1);
    assert!(matches!(&liked[0], LikedPet::Available { contact: Some(_), .. }));
}

#[::core::prelude::v1::test]
fn test_adoption_flow_in_memory() {
    let store = InMemoryStore::new();
    run_adoption_flow(&store);
}

#[::core::prelude::v1::test]
fn test_adoption_flow_csv() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::open(dir.path()).unwrap();
    run_adoption_flow(&store);

    let adopters = fs::read_to_string(dir.path().join("adopters.csv")).unwrap();
    assert!(adopters.lines().next().unwrap().contains("liked_pets"));
    assert_eq!(adopters.lines().count(), 2);
}

#[::core::prelude::v1::test]
fn test_csv_rows_with_blank_and_malformed_cells() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("adopters.csv"),
        "adopter_id,name,country,age,pref_species,pref_gender,house,garden,activity_level,allergy_friendly,apartment_size,username,password,liked_pets,skipped_pets\n\
         ADOP00AA01,Ada,NL,30,Dog,Any,No,No,High,No,,ada,secret,\"PET000001,PET000002\",\n\
         ADOP00AA02,Bo,NL,44,Cat,Whatever,Yes,No,Low,Yes,abc,bo,pw,\"PET 1;drop\",PET000001\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("pets.csv"),
        "pet_id,species,breed,gender,name,activity_level,age,allergy_friendly,time_in_shelter,disability_current,disability_past,special_needs,sheltername,image_path\n\
         PET000001,Dog,Beagle,Female,Bella,Medium,3,No,< 1 year,,,,North Paws,\n\
         PET000002,Dog,Boxer,Male,Rex,High,5,No,1-2 years,,,,North Paws,\n\
         PET000003,Dog,Pug,Male,Max,High,2,No,,,,,North Paws,max.jpg\n",
    )
    .unwrap();

    let store = CsvStore::open(dir.path()).unwrap();
    let ada = store.adopter("ADOP00AA01").unwrap().unwrap();
    assert_eq!(ada.apartment_size, 0.0);
    assert_eq!(ada.liked_pets.iter().collect::<Vec<_>>(), vec!["PET000001", "PET000002"]);

    let bo = store.adopter("ADOP00AA02").unwrap().unwrap();
    assert_eq!(bo.apartment_size, 0.0);
    assert_eq!(bo.pref_gender, PreferredGender::Unspecified);
    assert_eq!(bo.liked_pets.iter().collect::<Vec<_>>(), vec!["PET 1;drop"]);
    assert!(bo.skipped_pets.contains("PET000001"));

    // Blank apartment, no house or garden: high energy pets get no space signal
    let recommender = Recommender::with_default_weights();
    let ranked = recommender.recommend(&ada, store.list_pets().unwrap(), None).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].pet.pet_id, "PET000003");
    assert_eq!(ranked[0].breakdown.space, 0.0);
    assert_eq!(ranked[0].pet.image_path.as_deref(), Some("max.jpg"));

    // An unreadable gender preference earns no gender points
    let max = store.pet("PET000003").unwrap().unwrap();
    assert_eq!(recommender.score(&bo, &max).gender, 0.0);
}

#[::core::prelude::v1::test]
fn test_csv_decisions_keep_punctuated_pet_ids() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("shelters.csv"),
        "shelter_id,name,address,email,phone,username,password\n\
         SHEL000001,North Paws,1 Canal St,hello@paws.example,31201234567,north,pw\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("pets.csv"),
        "pet_id,species,breed,gender,name,activity_level,age,allergy_friendly,special_needs,sheltername\n\
         PET1,Dog,Beagle,Female,Bella,Low,3,No,,North Paws\n\
         PET.2,Dog,Boxer,Male,Rex,Low,5,No,,North Paws\n\
         PET#3,Dog,Pug,Male,Max,Low,2,No,,North Paws\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("adopters.csv"),
        "adopter_id,name,username,password,pref_species,pref_gender,liked_pets,skipped_pets\n\
         ADOP00AA01,Ada,ada,secret,Dog,Any,,\n",
    )
    .unwrap();

    let store = CsvStore::open(dir.path()).unwrap();
    let recommender = Recommender::with_default_weights();
    let mut ada = store.adopter("ADOP00AA01").unwrap().unwrap();
    let (ranked, mut session) = recommender.start_session(&ada, store.list_pets().unwrap(), None).unwrap();
    assert_eq!(ranked.len(), 3);

    recommender.decide(&mut ada, &mut session, "PET1", Decision::Like, &store).unwrap();
    recommender.decide(&mut ada, &mut session, "PET.2", Decision::Like, &store).unwrap();
    recommender.decide(&mut ada, &mut session, "PET#3", Decision::Skip, &store).unwrap();

    let reloaded = store.adopter("ADOP00AA01").unwrap().unwrap();
    assert_eq!(reloaded.liked_pets.iter().collect::<Vec<_>>(), vec!["PET1", "PET.2"]);
    assert_eq!(reloaded.skipped_pets.iter().collect::<Vec<_>>(), vec!["PET#3"]);

    let result = recommender.recommend(&reloaded, store.list_pets().unwrap(), None);
    assert!(matches!(result, Err(EngineError::NoCandidatesRemaining)));
}

#[::core::prelude::v1::test]
fn test_like_with_missing_shelter_keeps_state() {
    let store = InMemoryStore::new();
    let shelter = accounts::register_shelter(&store, shelter_request("North Paws", "north")).unwrap();
    let pet = accounts::add_pet(&store, &shelter.shelter_id, pet_request("Bella", "Dog", ActivityLevel::Low)).unwrap();
    let mut adopter = accounts::register_adopter(&store, adopter_request()).unwrap();

    let mut session = RecommendationSession::start([pet.pet_id.clone()]);

    // Rename the shelter out from under the pet
    let mut orphan = pet.clone();
    orphan.shelter_name = "Closed Shelter".to_string();
    store.update_pet(&orphan).unwrap();

    let recommender = Recommender::with_default_weights();
    let result = recommender.decide(&mut adopter, &mut session, &pet.pet_id, Decision::Like, &store);

    assert!(matches!(result, Err(EngineError::ShelterNotFound(_))));
    assert_eq!(session.state(), SessionState::Browsing);
    assert_eq!(session.current(), Some(pet.pet_id.as_str()));
    assert!(store.adopter(&adopter.adopter_id).unwrap().unwrap().liked_pets.is_empty());
}

#[::core::prelude::v1::test]
fn test_delete_shelter_cascades_pets() {
    let store = InMemoryStore::new();
    let north = accounts::register_shelter(&store, shelter_request("North Paws", "north")).unwrap();
    let south = accounts::register_shelter(&store, shelter_request("South Paws", "south")).unwrap();
    accounts::add_pet(&store, &north.shelter_id, pet_request("Bella", "Dog", ActivityLevel::Low)).unwrap();
    accounts::add_pet(&store, &north.shelter_id, pet_request("Rex", "Dog", ActivityLevel::High)).unwrap();
    accounts::add_pet(&store, &south.shelter_id, pet_request("Tom", "Cat", ActivityLevel::Low)).unwrap();

    assert_eq!(store.delete_shelter(&north.shelter_id).unwrap(), 2);

    let remaining = store.list_pets().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].shelter_name, "South Paws");
    assert!(store.shelter(&north.shelter_id).unwrap().is_none());
}

fn test_state(store: Arc<dyn AdoptionStore>) -> AppState {
    AppState {
        store,
        sessions: SessionCache::new(100, 60),
        media: MediaResolver::new(Some("https://media.example/pets".to_string())),
        recommender: Recommender::with_default_weights(),
        matching: MatchingSettings::default(),
    }
}

#[actix_web::test]
async fn test_http_browse_and_decide() {
    let state = test_state(Arc::new(InMemoryStore::new()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    // Shelter and pets
    let req = test::TestRequest::post()
        .uri("/api/v1/shelters")
        .set_json(json!({
            "name": "North Paws",
            "address": "1 Canal St",
            "email": "hello@paws.example",
            "phone": "+31 20 123 4567",
            "username": "NorthPaws",
            "password": "pw"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let shelter: Value = test::read_body_json(resp).await;
    let shelter_id = shelter["shelterId"].as_str().unwrap().to_string();
    assert!(shelter.get("password").is_none());

    let mut pet_ids = Vec::new();
    for (name, species, level, image) in [
        ("Bella", "Dog", "Medium", "bella.jpg"),
        ("Tom", "Cat", "Low", ""),
    ] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/shelters/{}/pets", shelter_id))
            .set_json(json!({
                "name": name,
                "species": species,
                "breed": "Mixed",
                "gender": "Female",
                "age": 3,
                "activityLevel": level,
                "imagePath": image
            }))
            .to_request();
        let pet: Value = test::call_and_read_body_json(&app, req).await;
        pet_ids.push(pet["petId"].as_str().unwrap().to_string());
    }

    // Adopter
    let req = test::TestRequest::post()
        .uri("/api/v1/adopters")
        .set_json(json!({
            "name": "Ada",
            "country": "NL",
            "age": 30,
            "username": "Ada",
            "password": "secret",
            "prefSpecies": "Dog",
            "prefGender": "Any",
            "activityLevel": "High",
            "hasHouse": true
        }))
        .to_request();
    let adopter: Value = test::call_and_read_body_json(&app, req).await;
    let adopter_id = adopter["adopterId"].as_str().unwrap().to_string();
    assert_eq!(adopter["username"], "ada");

    // Recommendations start a session on the best match
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/adopters/{}/recommendations", adopter_id))
        .to_request();
    let recs: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(recs["recommendations"].as_array().unwrap().len(), 2);
    assert_eq!(recs["recommendations"][0]["petId"], pet_ids[0].as_str());
    assert!((recs["recommendations"][0]["matchScore"].as_f64().unwrap() - 0.8).abs() < 1e-9);
    assert_eq!(
        recs["recommendations"][0]["imageUrl"],
        "https://media.example/pets/bella.jpg"
    );
    assert_eq!(recs["session"]["state"], "browsing");
    assert_eq!(recs["session"]["currentPet"]["petId"], pet_ids[0].as_str());

    // Deciding on a pet other than the one shown is rejected
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/adopters/{}/decisions", adopter_id))
        .set_json(json!({ "petId": pet_ids[1], "decision": "skip" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/adopters/{}/decisions", adopter_id))
        .set_json(json!({ "petId": pet_ids[0], "decision": "like" }))
        .to_request();
    let liked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(liked["outcome"]["kind"], "contact");
    assert_eq!(liked["outcome"]["phone"], "+312 01234567");
    assert!(liked["message"].as_str().unwrap().starts_with("Bella was liked by you."));
    assert_eq!(liked["session"]["currentPet"]["petId"], pet_ids[1].as_str());

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/adopters/{}/decisions", adopter_id))
        .set_json(json!({ "petId": pet_ids[1], "decision": "skip" }))
        .to_request();
    let skipped: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(skipped["outcome"]["kind"], "acknowledgement");
    assert_eq!(skipped["message"], "Tom has been skipped.");
    assert_eq!(skipped["session"]["state"], "exhausted");

    // Nothing left to recommend
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/adopters/{}/recommendations", adopter_id))
        .to_request();
    let recs: Value = test::call_and_read_body_json(&app, req).await;
    assert!(recs["recommendations"].as_array().unwrap().is_empty());
    assert_eq!(recs["message"], "No more pets to recommend.");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/adopters/{}/liked", adopter_id))
        .to_request();
    let liked: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(liked["count"], 1);
    assert_eq!(liked["likedPets"][0]["available"], true);
    assert_eq!(liked["likedPets"][0]["contact"]["address"], "1 Canal St");

    // Deleting the adopter drops the session too
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/adopters/{}", adopter_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/adopters/{}/session", adopter_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_http_errors() {
    let state = test_state(Arc::new(InMemoryStore::new()));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/adopters/ADOPNOPE/recommendations")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status_code"], 404);

    let req = test::TestRequest::post()
        .uri("/api/v1/shelters")
        .set_json(json!({
            "name": "Tiny",
            "address": "2 Road",
            "email": "tiny@paws.example",
            "phone": "12345",
            "username": "tiny",
            "password": "pw"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/adopters/login")
        .set_json(json!({ "username": "nobody", "password": "pw" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::patch()
        .uri("/api/v1/pets/PETNOPE")
        .set_json(json!({ "breed": "Pug" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/v1/species").to_request();
    let species: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(species["species"].as_array().unwrap().len(), 5);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["status"], "healthy");
}

/// In-memory store that records the thread of every call
#[derive(Default)]
struct ThreadTrackingStore {
    inner: InMemoryStore,
    threads: Mutex<Vec<ThreadId>>,
}

impl ThreadTrackingStore {
    fn touch(&self) {
        self.threads.lock().unwrap().push(thread::current().id());
    }
}

impl PetCatalog for ThreadTrackingStore {
    fn list_pets(&self) -> Result<Vec<PetRecord>, StoreError> {
        self.touch();
        self.inner.list_pets()
    }

    fn pet(&self, pet_id: &str) -> Result<Option<PetRecord>, StoreError> {
        self.touch();
        self.inner.pet(pet_id)
    }

    fn create_pet(&self, pet: PetRecord) -> Result<PetRecord, StoreError> {
        self.touch();
        self.inner.create_pet(pet)
    }

    fn update_pet(&self, pet: &PetRecord) -> Result<(), StoreError> {
        self.touch();
        self.inner.update_pet(pet)
    }
}

impl AdopterStore for ThreadTrackingStore {
    fn adopter(&self, adopter_id: &str) -> Result<Option<AdopterProfile>, StoreError> {
        self.touch();
        self.inner.adopter(adopter_id)
    }

    fn adopter_by_username(&self, username: &str) -> Result<Option<AdopterProfile>, StoreError> {
        self.touch();
        self.inner.adopter_by_username(username)
    }

    fn create_adopter(&self, adopter: AdopterProfile) -> Result<AdopterProfile, StoreError> {
        self.touch();
        self.inner.create_adopter(adopter)
    }

    fn update_adopter(&self, adopter: &AdopterProfile) -> Result<(), StoreError> {
        self.touch();
        self.inner.update_adopter(adopter)
    }

    fn delete_adopter(&self, adopter_id: &str) -> Result<bool, StoreError> {
        self.touch();
        self.inner.delete_adopter(adopter_id)
    }
}

impl ShelterStore for ThreadTrackingStore {
    fn shelter(&self, shelter_id: &str) -> Result<Option<ShelterProfile>, StoreError> {
        self.touch();
        self.inner.shelter(shelter_id)
    }

    fn shelter_by_name(&self, name: &str) -> Result<Option<ShelterProfile>, StoreError> {
        self.touch();
        self.inner.shelter_by_name(name)
    }

    fn shelter_by_username(&self, username: &str) -> Result<Option<ShelterProfile>, StoreError> {
        self.touch();
        self.inner.shelter_by_username(username)
    }

    fn create_shelter(&self, shelter: ShelterProfile) -> Result<ShelterProfile, StoreError> {
        self.touch();
        self.inner.create_shelter(shelter)
    }

    fn delete_shelter(&self, shelter_id: &str) -> Result<usize, StoreError> {
        self.touch();
        self.inner.delete_shelter(shelter_id)
    }
}

impl AdoptionStore for ThreadTrackingStore {}

#[actix_web::test]
async fn test_http_store_calls_run_off_the_async_worker() {
    let store = Arc::new(ThreadTrackingStore::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(store.clone())))
            .configure(routes::configure_routes),
    )
    .await;

    let shelter = accounts::register_shelter(store.as_ref(), shelter_request("North Paws", "north")).unwrap();
    let pet = accounts::add_pet(store.as_ref(), &shelter.shelter_id, pet_request("Bella", "Dog", ActivityLevel::Low)).unwrap();
    let adopter = accounts::register_adopter(store.as_ref(), adopter_request()).unwrap();
    store.threads.lock().unwrap().clear();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/adopters/{}/recommendations", adopter.adopter_id))
        .to_request();
    let recs: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(recs["recommendations"][0]["petId"], pet.pet_id.as_str());

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/adopters/{}/decisions", adopter.adopter_id))
        .set_json(json!({ "petId": pet.pet_id, "decision": "like" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/pets").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let threads = store.threads.lock().unwrap();
    assert!(!threads.is_empty());
    assert!(threads.iter().all(|id| *id != thread::current().id()));
}
