use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::{Environment, context};
use std::sync::Arc;
use crate::error::{ApiError, TuneError};
use crate::models::{
    GenerationRequest, MAX_LENGTH_RANGE, TEMPERATURE_RANGE, TOP_P_RANGE,
};
use crate::state::AppState;
use super::generate::run_generation;

const PAGE: &str = "index.html";

pub fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(PAGE, include_str!("../../templates/index.html"))?;
    Ok(env)
}

fn render(
    state: &AppState,
    form: &GenerationRequest,
    tune: Option<&str>,
    editor_url: Option<&str>,
    error: Option<&str>,
) -> Result<Html<String>, ApiError> {
    let page = state.templates.get_template(PAGE)?.render(context! {
        model => &state.model,
        form => form,
        limits => context! {
            max_length => [MAX_LENGTH_RANGE.start(), MAX_LENGTH_RANGE.end()],
            top_p => [TOP_P_RANGE.start(), TOP_P_RANGE.end()],
            temperature => [TEMPERATURE_RANGE.start(), TEMPERATURE_RANGE.end()],
        },
        tune => tune,
        editor_url => editor_url,
        error => error,
    })?;
    Ok(Html(page))
}

// What the page says when a submission fails
fn user_message(err: &ApiError) -> String {
    match err {
        ApiError::Tune(TuneError::Validation(msg)) if msg == "empty prompt" => {
            "Please enter a valid description!".to_string()
        }
        ApiError::Tune(TuneError::Validation(msg)) => msg.clone(),
        ApiError::Tune(TuneError::Generation(msg)) => format!("An error occurred: {msg}"),
        other => other.to_string(),
    }
}

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render(&state, &GenerationRequest::default(), None, None, None)
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<GenerationRequest>, FormRejection>,
) -> Result<Response, ApiError> {
    // unparsable slider values never reach the generator
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let page = render(
                &state,
                &GenerationRequest::default(),
                None,
                None,
                Some(&rejection.body_text()),
            )?;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    match run_generation(&state, form.clone()).await {
        Ok(result) => {
            let editor_url = state.editor.to_embeddable_url(&result.normalized_text);
            let page = render(
                &state,
                &form,
                Some(&result.normalized_text),
                Some(editor_url.as_str()),
                None,
            )?;
            Ok(page.into_response())
        }
        Err(err) => {
            let page = render(&state, &form, None, None, Some(&user_message(&err)))?;
            Ok((err.status(), page).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_template_parses() {
        assert!(templates().is_ok());
    }

    #[test]
    fn failures_read_like_the_form_expects() {
        let blank = ApiError::from(TuneError::Validation("empty prompt".into()));
        assert_eq!(user_message(&blank), "Please enter a valid description!");

        let failed = ApiError::from(TuneError::Generation("out of memory".into()));
        assert_eq!(user_message(&failed), "An error occurred: out of memory");
    }
}
