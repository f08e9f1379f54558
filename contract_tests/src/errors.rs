//! Error contract tests
//!
//! Every failure kind maps to a fixed status, error code and description.
//! Clients branch on these values.

#[cfg(test)]
mod tests {
    use crate::test_helpers::verify_failure_contract;
    use core_types::RequestId;
    use fs_view::PathError;
    use ipc::Response;
    use native_client::NativeError;
    use services_directory::OperationError;

    fn respond(error: OperationError) -> Response {
        Response::failure(
            RequestId::new(),
            error.status(),
            error.error_code(),
            error.description(),
        )
    }

    #[test]
    fn test_unauthorised_contract() {
        verify_failure_contract(&respond(OperationError::Unauthorised), 401, 401, "UNAUTHORISED");
        verify_failure_contract(
            &respond(NativeError::InvalidCredentials.into()),
            401,
            401,
            "UNAUTHORISED",
        );
    }

    #[test]
    fn test_validation_contract() {
        let cases = [
            (PathError::MissingParameter("rootPath".into()), "rootPath is missing"),
            (
                PathError::InvalidParameter("isPrivate".into()),
                "Invalid request. isPrivate is not valid",
            ),
            (PathError::MissingParameters, "REQUIRED_PARAMS_MISSING"),
            (PathError::InvalidPath("a//b".into()), "INVALID_DIR_PATH"),
            (PathError::CannotDeleteRoot, "CANNOT_DELETE_ROOT"),
        ];
        for (error, description) in cases {
            verify_failure_contract(&respond(error.into()), 400, 400, description);
        }
    }

    #[test]
    fn test_native_contract() {
        verify_failure_contract(
            &respond(NativeError::DirectoryNotFound.into()),
            404,
            404,
            "NfsError::DirectoryNotFound",
        );
        verify_failure_contract(
            &respond(NativeError::DirectoryAlreadyExists.into()),
            400,
            -1001,
            "NfsError::DirectoryAlreadyExistsWithSameName",
        );
        verify_failure_contract(
            &respond(NativeError::PermissionDenied.into()),
            400,
            -1504,
            "FfiError::PermissionDenied",
        );
        verify_failure_contract(
            &respond(NativeError::InvalidDestination.into()),
            400,
            400,
            "INVALID_DIR_PATH",
        );
    }

    #[test]
    fn test_internal_contract() {
        verify_failure_contract(
            &respond(NativeError::LibraryLoad("missing".into()).into()),
            500,
            -2,
            "LibraryLoadError",
        );
        verify_failure_contract(
            &respond(
                NativeError::Other {
                    code: -42,
                    message: "CoreError::RoutingFailure".into(),
                }
                .into(),
            ),
            500,
            -42,
            "CoreError::RoutingFailure",
        );
    }

    #[test]
    fn test_native_codes_stable() {
        let cases = [
            (NativeError::LibraryLoad(String::new()), -2),
            (NativeError::AccountExists, -10),
            (NativeError::InvalidCredentials, -11),
            (NativeError::SessionClosed, -12),
            (NativeError::DirectoryAlreadyExists, -1001),
            (NativeError::DirectoryNotFound, -1002),
            (NativeError::FileNotFound, -1003),
            (NativeError::FileAlreadyExists, -1004),
            (NativeError::InvalidDestination, -1005),
            (NativeError::InvalidWriter, -1006),
            (NativeError::PermissionDenied, -1504),
        ];
        for (error, code) in cases {
            assert_eq!(error.code(), code, "Native code of {:?} changed", error);
        }
    }
}
