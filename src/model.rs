use std::fmt;

use crate::error::Result;
use crate::Error;

/// Response status codes a middleware can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Created,
    Found,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    ServerError,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::Found => 302,
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::NotAcceptable => 406,
            Status::ServerError => 500,
        }
    }
}

impl TryFrom<u16> for Status {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Ok(match value {
            200 => Status::Ok,
            201 => Status::Created,
            302 => Status::Found,
            400 => Status::BadRequest,
            401 => Status::Unauthorized,
            403 => Status::Forbidden,
            404 => Status::NotFound,
            405 => Status::MethodNotAllowed,
            406 => Status::NotAcceptable,
            500 => Status::ServerError,
            _ => return Err(Error::UnknownStatus(value)),
        })
    }
}

impl From<Status> for http::StatusCode {
    fn from(value: Status) -> Self {
        match value {
            Status::Ok => http::StatusCode::OK,
            Status::Created => http::StatusCode::CREATED,
            Status::Found => http::StatusCode::FOUND,
            Status::BadRequest => http::StatusCode::BAD_REQUEST,
            Status::Unauthorized => http::StatusCode::UNAUTHORIZED,
            Status::Forbidden => http::StatusCode::FORBIDDEN,
            Status::NotFound => http::StatusCode::NOT_FOUND,
            Status::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Status::NotAcceptable => http::StatusCode::NOT_ACCEPTABLE,
            Status::ServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Media types for the `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    ApplicationFormUrlEncoded,
    ApplicationJson,
    ApplicationJavascript,
    ApplicationOctetStream,
    ApplicationXml,
    ImageGif,
    ImageJpeg,
    ImagePng,
    MultipartFormData,
    TextCsv,
    TextHtml,
    TextPlain,
    TextXml,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::ApplicationFormUrlEncoded => "application/x-www-form-urlencoded",
            MediaType::ApplicationJson => "application/json",
            MediaType::ApplicationJavascript => "application/javascript",
            MediaType::ApplicationOctetStream => "application/octet-stream",
            MediaType::ApplicationXml => "application/xml",
            MediaType::ImageGif => "image/gif",
            MediaType::ImageJpeg => "image/jpeg",
            MediaType::ImagePng => "image/png",
            MediaType::MultipartFormData => "multipart/form-data",
            MediaType::TextCsv => "text/csv",
            MediaType::TextHtml => "text/html",
            MediaType::TextPlain => "text/plain",
            MediaType::TextXml => "text/xml",
        }
    }
}

impl From<MediaType> for http::HeaderValue {
    fn from(value: MediaType) -> Self {
        http::HeaderValue::from_static(value.as_str())
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_codes_survive_u16() {
        for code in [200, 201, 302, 400, 401, 403, 404, 405, 406, 500] {
            let status = Status::try_from(code).unwrap();
            assert_eq!(status.code(), code);
            assert_eq!(http::StatusCode::from(status).as_u16(), code);
        }
    }

    #[test]
    fn unknown_status() {
        assert!(matches!(
            Status::try_from(418),
            Err(Error::UnknownStatus(418))
        ));
    }

    #[test]
    fn media_type_display() {
        assert_eq!(MediaType::ApplicationJson.to_string(), "application/json");
        assert_eq!(MediaType::TextPlain.as_str(), "text/plain");
        assert_eq!(
            http::HeaderValue::from(MediaType::MultipartFormData),
            "multipart/form-data"
        );
    }
}
