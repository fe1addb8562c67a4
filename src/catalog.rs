use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub day: String,
    pub time: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubContacts {
    pub leader: Contact,
    pub advisor: Contact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    // Older fixture sets spelled the flag `isOpen` / `isOpenForApplications`.
    #[serde(alias = "isOpen", alias = "isOpenForApplications")]
    pub accepting_applications: bool,
    pub meeting: Meeting,
    pub contacts: ClubContacts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Member,
    Leader,
    Advisor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub club_id: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: String,
    pub email: String,
    pub full_name: String,
    pub grade: String,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenFilter {
    All,
    Open,
    Closed,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClubFilter {
    pub search: Option<String>,
    pub status: Option<OpenFilter>,
    pub tag: Option<String>,
}

/// Read-only reference data: the club catalog and the student roster, loaded
/// once at startup. Nothing in the application ever mutates it.
#[derive(Debug)]
pub struct Catalog {
    clubs: Vec<Club>,
    students: Vec<Student>,
}

impl Catalog {
    pub fn new(clubs: Vec<Club>, students: Vec<Student>) -> anyhow::Result<Catalog> {
        let mut ids = HashSet::new();
        let mut slugs = HashSet::new();
        for club in &clubs {
            if !ids.insert(club.id.as_str()) {
                bail!("duplicate club id: {}", club.id);
            }
            if !slugs.insert(club.slug.as_str()) {
                bail!("duplicate club slug: {}", club.slug);
            }
        }
        Ok(Catalog { clubs, students })
    }

    pub fn load(dir: &Path) -> anyhow::Result<Catalog> {
        let clubs = read_json(&dir.join("clubs.json"))?;
        let students = read_json(&dir.join("students.json"))?;
        Catalog::new(clubs, students)
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn club_by_id(&self, id: &str) -> Option<&Club> {
        self.clubs.iter().find(|club| club.id == id)
    }

    pub fn club_by_slug(&self, slug: &str) -> Option<&Club> {
        self.clubs.iter().find(|club| club.slug == slug)
    }

    /// Resolves the id-or-slug keys used by club detail links.
    pub fn find_club(&self, key: &str) -> Option<&Club> {
        self.club_by_slug(key).or_else(|| self.club_by_id(key))
    }

    pub fn student_by_email(&self, email: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.email == email)
    }

    pub fn student_by_id(&self, student_id: &str) -> Option<&Student> {
        self.students
            .iter()
            .find(|student| student.student_id == student_id)
    }

    /// Catalog browsing: open/closed filter, tag filter, then a substring
    /// search over name, short description and tags. Results come back
    /// sorted by club name.
    pub fn filter_clubs(&self, filter: &ClubFilter) -> Vec<&Club> {
        let mut clubs: Vec<&Club> = self
            .clubs
            .iter()
            .filter(|club| match filter.status.unwrap_or(OpenFilter::All) {
                OpenFilter::All => true,
                OpenFilter::Open => club.accepting_applications,
                OpenFilter::Closed => !club.accepting_applications,
            })
            .filter(|club| {
                filter
                    .tag
                    .as_ref()
                    .map_or(true, |tag| club.tags.iter().any(|t| t == tag))
            })
            .filter(|club| match filter.search.as_deref() {
                None | Some("") => true,
                Some(query) => {
                    let query = query.to_lowercase();
                    club.name.to_lowercase().contains(&query)
                        || club.short_description.to_lowercase().contains(&query)
                        || club.tags.iter().any(|t| t.to_lowercase().contains(&query))
                }
            })
            .collect();
        clubs.sort_by(|a, b| a.name.cmp(&b.name));
        clubs
    }

    /// Distinct tags across the catalog, sorted, for the category filter.
    pub fn tags(&self) -> Vec<String> {
        self.clubs
            .iter()
            .flat_map(|club| club.tags.iter().cloned())
            .sorted()
            .dedup()
            .collect()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
pub(crate) fn sample_catalog() -> Catalog {
    let clubs = serde_json::from_value(serde_json::json!([
        {
            "id": "mun",
            "slug": "model-united-nations",
            "name": "Model United Nations",
            "description": "Simulated UN committees, debate and resolution writing.",
            "shortDescription": "Diplomacy and debate through simulated UN conferences.",
            "tags": ["Academic"],
            "acceptingApplications": true,
            "meeting": { "day": "Tuesday", "time": "15:30-17:00", "location": "Room 204" },
            "contacts": {
                "leader": { "name": "Nina Srisuk", "email": "650042@student.amnuaysilpa.ac.th" },
                "advisor": { "name": "Mr. Davies", "email": "davies@amnuaysilpa.ac.th" }
            }
        },
        {
            "id": "unicef",
            "slug": "unicef",
            "name": "UNICEF",
            "description": "Advocacy, fundraising and service projects for children's rights.",
            "shortDescription": "Local initiatives behind UNICEF's global mission.",
            "tags": ["Community Service"],
            "isOpen": true,
            "meeting": { "day": "Thursday", "time": "15:30-16:30", "location": "Room 112" },
            "contacts": {
                "leader": { "name": "Praew Chaiyasit", "email": "650077@student.amnuaysilpa.ac.th" },
                "advisor": { "name": "Ms. Hartley", "email": "hartley@amnuaysilpa.ac.th" }
            }
        },
        {
            "id": "sports",
            "slug": "sports",
            "name": "Sports",
            "description": "Teamwork and competition across athletic activities.",
            "shortDescription": "Stay active through team sports and tournaments.",
            "tags": ["Athletics"],
            "acceptingApplications": false,
            "meeting": { "day": "Friday", "time": "16:00-18:00", "location": "Sports Complex" },
            "contacts": {
                "leader": { "name": "Ton Akkarat", "email": "640150@student.amnuaysilpa.ac.th" },
                "advisor": { "name": "Coach Preecha", "email": "preecha@amnuaysilpa.ac.th" }
            }
        }
    ]))
    .unwrap();
    let students = serde_json::from_value(serde_json::json!([
        {
            "studentId": "650123",
            "email": "650123@student.amnuaysilpa.ac.th",
            "fullName": "Anan Wattana",
            "grade": "Grade 11",
            "memberships": [
                { "clubId": "sports", "role": "Member", "joinedAt": "2024-06-01T08:00:00Z" }
            ]
        },
        {
            "studentId": "650077",
            "email": "650077@student.amnuaysilpa.ac.th",
            "fullName": "Praew Chaiyasit",
            "grade": "Grade 12",
            "memberships": [
                { "clubId": "unicef", "role": "Leader", "joinedAt": "2023-08-15T08:00:00Z" }
            ]
        }
    ]))
    .unwrap();
    Catalog::new(clubs, students).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_id_slug_and_email() {
        let catalog = sample_catalog();

        assert_eq!(catalog.club_by_id("mun").unwrap().name, "Model United Nations");
        assert_eq!(catalog.club_by_slug("model-united-nations").unwrap().id, "mun");
        assert!(catalog.club_by_id("chess").is_none());

        // find_club resolves either key form.
        assert_eq!(catalog.find_club("mun").unwrap().id, "mun");
        assert_eq!(catalog.find_club("model-united-nations").unwrap().id, "mun");

        let student = catalog
            .student_by_email("650123@student.amnuaysilpa.ac.th")
            .unwrap();
        assert_eq!(student.full_name, "Anan Wattana");
        assert_eq!(catalog.student_by_id("650077").unwrap().grade, "Grade 12");
        assert!(catalog.student_by_email("nobody@student.amnuaysilpa.ac.th").is_none());
    }

    #[test]
    fn legacy_open_flag_spelling_is_accepted() {
        // The "unicef" entry in the sample uses `isOpen`.
        let catalog = sample_catalog();
        assert!(catalog.club_by_id("unicef").unwrap().accepting_applications);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let catalog = sample_catalog();
        let mut clubs = catalog.clubs().to_vec();
        let mut copy = clubs[0].clone();
        copy.slug = "another-slug".to_string();
        clubs.push(copy);
        let err = Catalog::new(clubs, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("duplicate club id"));
    }

    #[test]
    fn duplicate_slugs_are_rejected() {
        let catalog = sample_catalog();
        let mut clubs = catalog.clubs().to_vec();
        let mut copy = clubs[0].clone();
        copy.id = "another-id".to_string();
        clubs.push(copy);
        let err = Catalog::new(clubs, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("duplicate club slug"));
    }

    #[test]
    fn filters_by_open_state_tag_and_search() {
        let catalog = sample_catalog();

        let all = catalog.filter_clubs(&ClubFilter::default());
        assert_eq!(all.len(), 3);
        // Sorted by name.
        assert_eq!(all[0].name, "Model United Nations");
        assert_eq!(all[2].name, "UNICEF");

        let open = catalog.filter_clubs(&ClubFilter {
            status: Some(OpenFilter::Open),
            ..ClubFilter::default()
        });
        assert!(open.iter().all(|club| club.accepting_applications));
        assert_eq!(open.len(), 2);

        let closed = catalog.filter_clubs(&ClubFilter {
            status: Some(OpenFilter::Closed),
            ..ClubFilter::default()
        });
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id, "sports");

        let academic = catalog.filter_clubs(&ClubFilter {
            tag: Some("Academic".to_string()),
            ..ClubFilter::default()
        });
        assert_eq!(academic.len(), 1);
        assert_eq!(academic[0].id, "mun");

        let searched = catalog.filter_clubs(&ClubFilter {
            search: Some("diplomacy".to_string()),
            ..ClubFilter::default()
        });
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].id, "mun");

        let none = catalog.filter_clubs(&ClubFilter {
            search: Some("robotics".to_string()),
            ..ClubFilter::default()
        });
        assert!(none.is_empty());
    }

    #[test]
    fn tags_are_sorted_and_distinct() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.tags(),
            vec!["Academic", "Athletics", "Community Service"]
        );
    }

    #[test]
    fn shipped_fixtures_parse_and_validate() {
        let catalog = Catalog::load(Path::new("data")).unwrap();
        assert!(catalog.club_by_id("mun").is_some());
        assert!(!catalog.clubs().is_empty());
        assert!(catalog
            .student_by_email("650123@student.amnuaysilpa.ac.th")
            .is_some());
    }
}
