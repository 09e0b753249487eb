//! S3 / MinIO: archive of uploaded resume PDFs.

use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
pub async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobmatch-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by subdomain.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

pub fn resume_pdf_key(resume_id: Uuid) -> String {
    format!("resumes/{resume_id}.pdf")
}

/// Stores the original PDF and returns its object key.
pub async fn archive_resume_pdf(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    resume_id: Uuid,
    pdf: Bytes,
) -> Result<String, AppError> {
    let key = resume_pdf_key(resume_id);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(pdf))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Upload of {key} failed: {e}")))?;

    info!("Archived resume PDF to s3://{}/{}", bucket, key);
    Ok(key)
}
