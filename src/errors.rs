use std::fmt;

/// Error types for image cloud operations
#[derive(Debug)]
pub enum MosaicError {
    /// Cell coordinates outside the grid
    InvalidCoordinates {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// Configuration errors
    ConfigError(String),
    /// Image list could not be loaded or is unusable
    ImageList(String),
    /// A tiling does not partition the grid
    Partition(String),
    /// Renderer backend failures (terminal setup, drawing)
    Render(String),
    /// File system errors
    Io(std::io::Error),
    /// JSON (de)serialization errors
    Json(serde_json::Error),
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MosaicError::InvalidCoordinates {
                row,
                col,
                rows,
                cols,
            } => {
                write!(
                    f,
                    "Invalid grid coordinates ({}, {}) - grid size is {}x{}",
                    row, col, rows, cols
                )
            }
            MosaicError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MosaicError::ImageList(msg) => write!(f, "Image list error: {}", msg),
            MosaicError::Partition(msg) => write!(f, "Invalid tiling: {}", msg),
            MosaicError::Render(msg) => write!(f, "Render error: {}", msg),
            MosaicError::Io(err) => write!(f, "I/O error: {}", err),
            MosaicError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MosaicError::Io(err) => Some(err),
            MosaicError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        MosaicError::Io(err)
    }
}

impl From<serde_json::Error> for MosaicError {
    fn from(err: serde_json::Error) -> Self {
        MosaicError::Json(err)
    }
}

/// Result type alias for image cloud operations
pub type MosaicResult<T> = Result<T, MosaicError>;

/// Validate cell coordinates against grid dimensions
pub fn validate_cell_coordinates(
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) -> MosaicResult<()> {
    if row >= rows || col >= cols {
        Err(MosaicError::InvalidCoordinates {
            row,
            col,
            rows,
            cols,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cell_coordinates() {
        assert!(validate_cell_coordinates(0, 0, 1, 1).is_ok());
        assert!(validate_cell_coordinates(6, 6, 7, 7).is_ok());
        match validate_cell_coordinates(7, 2, 7, 7) {
            Err(MosaicError::InvalidCoordinates { row, col, .. }) => {
                assert_eq!((row, col), (7, 2));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let err = MosaicError::InvalidCoordinates {
            row: 9,
            col: 1,
            rows: 7,
            cols: 7,
        };
        assert_eq!(
            err.to_string(),
            "Invalid grid coordinates (9, 1) - grid size is 7x7"
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "imglist.json");
        let err: MosaicError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
