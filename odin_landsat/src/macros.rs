/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! syntactic sugar macros used by the odin_landsat binaries

/// define a lazy static CLI options struct with the given name, using clap's derive API:
/// ```ignore
/// define_cli! { ARGS [about="find Landsat scenes for a location"] =
///     config: String [help="filename of config", long, default_value="landsat.ron"],
///     lat: f64 [help="latitude in degrees", long, allow_hyphen_values=true]
/// }
/// ```
/// expands into
/// ```ignore
/// #[derive(clap::Parser)]
/// #[command(about="find Landsat scenes for a location")]
/// struct CliOpts {
///     #[arg(help="filename of config", long, default_value="landsat.ron")]
///     config: String,
///     ...
/// }
/// lazy_static! { static ref ARGS: CliOpts = CliOpts::parse(); }
/// ```
/// fields are parsed on first access of `ARGS`
#[macro_export]
macro_rules! define_cli {
    ($name:ident [ $( $sopt:ident $(= $sx:expr)? ),* ] = $( $( #[$meta:meta] )? $fname:ident : $ftype:ty [ $( $fopt:ident $(= $fx:expr)?),* ] ),* ) => {
        use clap::Parser;
        use lazy_static::lazy_static;

        #[derive(Parser,Debug)]
        #[command( $( $sopt $(=$sx)? ),* )]
        struct CliOpts {
            $(
                #[arg( $( $fopt $(=$fx)? ),* )]
                $(#[$meta])?
                $fname : $ftype,
            )*
        }
        lazy_static! { static ref $name: CliOpts = CliOpts::parse(); }
    }
}
