//===========================================================================//

macro_rules! invalid_data {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_input {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidInput,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidInput,
                                         format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_image {
    ($e:expr) => {
        return Err($crate::error::ExportError::InvalidImage(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::ExportError::InvalidImage(
            format!($fmt, $($arg)+),
        ))
    };
}

//===========================================================================//
