use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};

use crate::models::{CreateDoctorRequest, Doctor};

/// Doctor roster maintenance. Administrative glue with no invariants of its
/// own beyond the admin gate applied at the routes.
pub struct DoctorService {
    supabase: Arc<SupabaseClient>,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn add_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor> {
        debug!("Adding doctor {}", request.email);

        let row = json!({
            "name": request.name,
            "email": request.email,
            "specialty": request.specialty,
            "image_url": request.image_url
        });

        match self.supabase.insert_unique::<Doctor>("doctors", row).await {
            Ok(doctor) => {
                info!("Doctor {} added", doctor.id);
                Ok(doctor)
            }
            Err(DbError::UniqueViolation(_)) => {
                Err(anyhow!("a doctor with email {} already exists", request.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        let doctors = self.supabase.select("doctors?order=name.asc").await?;
        Ok(doctors)
    }

    pub async fn remove_doctor(&self, doctor_id: Uuid) -> Result<()> {
        self.supabase.delete(&format!("doctors?id=eq.{}", doctor_id)).await?;
        info!("Doctor {} removed", doctor_id);
        Ok(())
    }
}
