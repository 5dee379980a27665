use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::language::handler::list_languages,
        crate::modules::language::handler::list_target_languages,
        crate::modules::video::handler::upload_video,
        crate::modules::video::handler::list_videos,
        crate::modules::video::handler::get_video,
        crate::modules::dubbing::handler::create_job,
        crate::modules::dubbing::handler::list_jobs,
        crate::modules::dubbing::handler::get_job,
        crate::modules::dubbing::handler::download_output,
    ),
    components(
        schemas(
            crate::modules::language::dto::LanguageResponse,
            crate::modules::video::dto::VideoResponse,
            crate::modules::dubbing::model::DubbingStatus,
            crate::modules::dubbing::dto::CreateJobRequest,
            crate::modules::dubbing::dto::DubbingJobResponse,
        )
    ),
    tags(
        (name = "Languages", description = "Supported dubbing languages"),
        (name = "Videos", description = "Source video uploads"),
        (name = "Dubbing", description = "Dubbing jobs and their output")
    )
)]
pub struct ApiDoc;
