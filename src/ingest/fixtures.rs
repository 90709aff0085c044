/// Test fixtures: representative contents of the external tool outputs.
///
/// These are truncated to the minimum needed to exercise the parsers but
/// keep the real layout:
///
/// - hfreq files: one header line, then `level frequency` pairs with levels
///   ascending (so frequencies descending).
/// - viewer exports: comma separated with the padding the viewer writes
///   around every separator, a location label carrying `km####`, the
///   series label and one column per parameter.

/// Frequency line for a river axis location, 10 to 1e6 years.
#[cfg(test)]
pub(crate) fn fixture_hfreq_text() -> &'static str {
    "    Waterstand    Frequentie\n\
     3.215  1.000E-01\n\
     3.642  1.000E-02\n\
     4.018  1.000E-03\n\
     4.377  1.000E-04\n\
     4.701  1.000E-05\n\
     5.006  1.000E-06\n"
}

/// A result file that lost its frequency column.
#[cfg(test)]
pub(crate) fn fixture_hfreq_one_column() -> &'static str {
    "Waterstand\n3.215\n3.642\n"
}

/// Viewer export with a reference (`Defintf`) and one scenario series.
/// The scenario misses km 12, the reference misses km 13.
#[cfg(test)]
pub(crate) fn fixture_viewer_csv() -> &'static str {
    "Locatie (-) , Serie , Waterstand (m+NAP) , HBN (m+NAP) , X (m) , Y (m)\n\
     RIJN_km0010 , Defintf_2023 , 1.00 , 2.10 , 190000.0 , 430000.0\n\
     RIJN_km0011 , Defintf_2023 , 1.10 , 2.20 , 190800.0 , 430500.0\n\
     RIJN_km0012 , Defintf_2023 , 1.20 , 2.30 , 191500.0 , 431100.0\n\
     RIJN_km0010 , B2035_OnMt ,  0.90 , 2.00 , 190000.0 , 430000.0\n\
     RIJN_km0011 , B2035_OnMt ,  1.15 , 2.25 , 190800.0 , 430500.0\n\
     RIJN_km0013 , B2035_OnMt ,  2.00 , 3.00 , 192300.0 , 431600.0\n"
}

/// Viewer export without coordinates and with a location lacking a km marker.
#[cfg(test)]
pub(crate) fn fixture_viewer_csv_no_coordinates() -> &'static str {
    "Locatie (-),Serie,Waterstand (m+NAP)\n\
     RIJN_km0020,Defintf,1.20\n\
     Sluis Hagestein,Defintf,1.25\n\
     RIJN_km0020,B2035,1.10\n\
     RIJN_km0021,B2035,n.v.t.\n"
}
