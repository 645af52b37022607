use crate::model::{DraftScores, Student};
use crate::stats::StudentGpa;
use eyre::{Error, WrapErr, bail, eyre};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The record service as seen by the student table.
pub trait StudentsApi {
    async fn all_students(&self) -> Result<Vec<Student>, Error>;

    async fn students_gpa(&self) -> Result<Vec<StudentGpa>, Error>;

    /// Send new scores for a student and return the server's message.
    async fn update_scores(&self, roll_no: &str, scores: &DraftScores) -> Result<String, Error>;
}

#[derive(Serialize)]
struct ScoresUpdate<'a> {
    scores: &'a DraftScores,
}

#[derive(Deserialize)]
struct Ack {
    message: String,
}

pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base: &str) -> Result<Self, Error> {
        Ok(Self {
            client: Client::new(),
            base: Url::parse(base).wrap_err_with(|| format!("invalid server url {base:?}"))?,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| eyre!("server url {} cannot hold a path", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn check(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let reason = match response.json::<serde_json::Value>().await {
        Ok(body) => body["error"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .unwrap_or("no details")
            .to_owned(),
        Err(_) => "no details".to_owned(),
    };
    bail!("server answered {status}: {reason}")
}

impl StudentsApi for HttpApi {
    async fn all_students(&self) -> Result<Vec<Student>, Error> {
        debug!("Started fetch");
        let response = self.client.get(self.url(&["allStudents"])?).send().await?;
        let students = check(response).await?.json().await?;
        debug!("Completed fetch");
        Ok(students)
    }

    async fn students_gpa(&self) -> Result<Vec<StudentGpa>, Error> {
        let response = self.client.get(self.url(&["studentsGPA"])?).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update_scores(&self, roll_no: &str, scores: &DraftScores) -> Result<String, Error> {
        let response = self
            .client
            .put(self.url(&["student", roll_no])?)
            .json(&ScoresUpdate { scores })
            .send()
            .await?;
        let ack: Ack = check(response).await?.json().await?;
        Ok(ack.message)
    }
}
