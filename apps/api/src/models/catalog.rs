use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: u32,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub experience: String,
    pub salary: String,
    pub skills: Vec<String>,
    pub description: String,
    pub posted_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub instructor: String,
    pub rating: f32,
    pub reviews: u32,
    pub skills: Vec<String>,
    pub level: String,
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u32,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub speakers: Vec<String>,
    pub topics: Vec<String>,
    pub registration_deadline: String,
    pub capacity: String,
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: u32,
    pub name: String,
    pub image: String,
    pub role: String,
    pub batch: String,
    pub rating: u8,
    pub testimonial: String,
    pub company: String,
    pub package: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistic {
    pub label: String,
    pub value: String,
}
